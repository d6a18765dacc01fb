//! Type-erased mailbox entries.

use std::marker::PhantomData;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::actor_system::actor::{Actor, ActorContext, Handler, Message};

#[async_trait]
pub trait MessageHandler<A: Actor>: Send {
    async fn handle(&mut self, actor: &mut A, ctx: &mut ActorContext);
}

pub(crate) struct ActorMessage<M, A>
where
    M: Message,
    A: Handler<M>,
{
    payload: Option<M>,
    rsvp: Option<oneshot::Sender<M::Response>>,
    _phantom_actor: PhantomData<fn() -> A>,
}

#[async_trait]
impl<M, A> MessageHandler<A> for ActorMessage<M, A>
where
    M: Message,
    A: Handler<M>,
{
    async fn handle(&mut self, actor: &mut A, ctx: &mut ActorContext) {
        let Some(payload) = self.payload.take() else {
            log::error!("Mailbox entry for '{}' handled twice", ctx.name);
            return;
        };

        let result = actor.handle(payload, ctx).await;

        if let Some(rsvp) = self.rsvp.take() {
            if rsvp.send(result).is_err() {
                log::debug!("Caller of '{}' stopped waiting for a response", ctx.name);
            }
        }
    }
}

impl<M, A> ActorMessage<M, A>
where
    M: Message,
    A: Handler<M>,
{
    pub fn new(msg: M, rsvp: Option<oneshot::Sender<M::Response>>) -> Self {
        ActorMessage {
            payload: Some(msg),
            rsvp,
            _phantom_actor: PhantomData,
        }
    }
}

pub type BoxedMessageHandler<A> = Box<dyn MessageHandler<A>>;
pub type MailboxReceiver<A> = mpsc::UnboundedReceiver<BoxedMessageHandler<A>>;
pub type MailboxSender<A> = mpsc::UnboundedSender<BoxedMessageHandler<A>>;

pub fn mailbox<A: Actor>() -> (MailboxSender<A>, MailboxReceiver<A>) {
    mpsc::unbounded_channel()
}
