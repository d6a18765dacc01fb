pub(crate) mod handler;
pub(crate) mod runner;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::actor_system::system::ActorSystem;

/// Gives a running actor access to its name and the system it lives in.
#[derive(Debug)]
pub struct ActorContext {
    pub name: String,
    pub system: ActorSystem,
}

/// Defines what an actor will receive as its message, and with what it should respond.
pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

#[async_trait]
pub trait Actor: Send + 'static {
    /// Runs before the first message. An error keeps the actor from starting.
    async fn pre_start(&mut self, _ctx: &mut ActorContext) -> Result<(), ActorError> {
        Ok(())
    }

    /// Runs once the mailbox has closed.
    async fn post_stop(&mut self, _ctx: &mut ActorContext) {}
}

#[async_trait]
pub trait Handler<M: Message>: Actor {
    async fn handle(&mut self, msg: M, ctx: &mut ActorContext) -> M::Response;
}

/// A clonable handle to an actor's mailbox.
pub struct ActorRef<A: Actor> {
    name: String,
    sender: handler::MailboxSender<A>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queues a message without waiting for it to be handled.
    pub fn tell<M>(&self, msg: M) -> Result<(), ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let message = handler::ActorMessage::<M, A>::new(msg, None);
        self.sender.send(Box::new(message)).map_err(|error| {
            log::error!("Failed to tell {}: {}", self.name, error);
            ActorError::SendError(error.to_string())
        })
    }

    /// Queues a message and waits for the handler's response.
    pub async fn ask<M>(&self, msg: M) -> Result<M::Response, ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_sender, response_receiver) = oneshot::channel();
        let message = handler::ActorMessage::<M, A>::new(msg, Some(response_sender));
        if let Err(error) = self.sender.send(Box::new(message)) {
            log::error!("Failed to ask {}: {}", self.name, error);
            return Err(ActorError::SendError(error.to_string()));
        }

        response_receiver
            .await
            .map_err(|error| ActorError::SendError(error.to_string()))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub(crate) fn new(name: String, sender: handler::MailboxSender<A>) -> Self {
        ActorRef { name, sender }
    }
}

impl<A: Actor> std::fmt::Debug for ActorRef<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActorRef({})", self.name)
    }
}

#[derive(Error, Debug)]
pub enum ActorError {
    #[error("Actor {0} already exists")]
    Exists(String),

    #[error("Sending message failed: {0}")]
    SendError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_system::EventBus;

    struct Counter {
        total: u32,
    }

    impl Actor for Counter {}

    struct Add(u32);

    impl Message for Add {
        type Response = ();
    }

    struct Total;

    impl Message for Total {
        type Response = u32;
    }

    #[async_trait]
    impl Handler<Add> for Counter {
        async fn handle(&mut self, msg: Add, _ctx: &mut ActorContext) {
            self.total += msg.0;
        }
    }

    #[async_trait]
    impl Handler<Total> for Counter {
        async fn handle(&mut self, _msg: Total, _ctx: &mut ActorContext) -> u32 {
            self.total
        }
    }

    #[tokio::test]
    async fn test_tell_then_ask_is_ordered() {
        let system = ActorSystem::new("test", EventBus::new(16));
        let counter = system
            .create_actor("counter", Counter { total: 0 })
            .await
            .unwrap();

        for i in 1..=4 {
            counter.tell(Add(i)).unwrap();
        }
        assert_eq!(counter.ask(Total).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let system = ActorSystem::new("test", EventBus::new(16));
        system
            .create_actor("counter", Counter { total: 0 })
            .await
            .unwrap();

        let again = system.create_actor("counter", Counter { total: 0 }).await;
        assert!(matches!(again, Err(ActorError::Exists(_))));

        let found = system.get_actor::<Counter>("counter").await;
        assert!(found.is_some());
    }
}
