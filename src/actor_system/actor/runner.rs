use crate::actor_system::system::ActorSystem;

use super::{
    Actor, ActorContext, ActorRef,
    handler::{MailboxReceiver, mailbox},
};

pub(crate) struct ActorRunner<A: Actor> {
    name: String,
    actor: A,
    receiver: MailboxReceiver<A>,
}

impl<A: Actor> ActorRunner<A> {
    pub fn create(name: &str, actor: A) -> (Self, ActorRef<A>) {
        let (sender, receiver) = mailbox();
        let actor_ref = ActorRef::new(name.to_string(), sender);
        let runner = ActorRunner {
            name: name.to_string(),
            actor,
            receiver,
        };
        (runner, actor_ref)
    }

    /// Drains the mailbox one message at a time until every sender is gone.
    pub async fn start(mut self, system: ActorSystem) {
        log::debug!("Starting actor '{}'...", &self.name);

        let mut ctx = ActorContext {
            name: self.name.clone(),
            system: system.clone(),
        };

        if let Err(error) = self.actor.pre_start(&mut ctx).await {
            log::error!("Actor '{}' failed to start: {}", &self.name, error);
            self.receiver.close();
            system.stop_actor(&self.name).await;
            return;
        }

        log::debug!("Actor '{}' has started successfully.", &self.name);

        while let Some(mut msg) = self.receiver.recv().await {
            msg.handle(&mut self.actor, &mut ctx).await;
        }

        self.actor.post_stop(&mut ctx).await;
        system.stop_actor(&self.name).await;

        log::debug!("Actor '{}' stopped.", &self.name);
    }
}
