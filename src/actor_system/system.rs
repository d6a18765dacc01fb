use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use crate::actor_system::actor::runner::ActorRunner;
use crate::actor_system::{Actor, ActorError, ActorRef, EventBus};
use crate::types::LobbyEvent;

type ActorMap = HashMap<String, Box<dyn Any + Send + Sync>>;

/// Registry of running actors plus the shared event bus.
#[derive(Clone)]
pub struct ActorSystem {
    name: String,
    bus: EventBus,
    actors: Arc<RwLock<ActorMap>>,
}

impl ActorSystem {
    pub fn new(name: &str, bus: EventBus) -> Self {
        ActorSystem {
            name: name.to_string(),
            bus,
            actors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn publish(&self, event: LobbyEvent) {
        self.bus.send(event);
    }

    pub fn events(&self) -> broadcast::Receiver<LobbyEvent> {
        self.bus.subscribe()
    }

    /// Spawns `actor` on the runtime under `name`.
    pub async fn create_actor<A: Actor>(
        &self,
        name: &str,
        actor: A,
    ) -> Result<ActorRef<A>, ActorError> {
        let mut actors = self.actors.write().await;
        if actors.contains_key(name) {
            return Err(ActorError::Exists(name.to_string()));
        }

        let (runner, actor_ref) = ActorRunner::create(name, actor);
        actors.insert(name.to_string(), Box::new(actor_ref.clone()));
        drop(actors);

        let system = self.clone();
        tokio::spawn(runner.start(system));

        log::debug!("Created actor '{}' in system '{}'", name, self.name);
        Ok(actor_ref)
    }

    pub async fn get_actor<A: Actor>(&self, name: &str) -> Option<ActorRef<A>> {
        let actors = self.actors.read().await;
        actors
            .get(name)
            .and_then(|any| any.downcast_ref::<ActorRef<A>>())
            .cloned()
    }

    /// Forgets the actor. It finishes once every outstanding reference is gone.
    pub async fn stop_actor(&self, name: &str) {
        self.actors.write().await.remove(name);
    }
}

impl std::fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorSystem").field("name", &self.name).finish()
    }
}
