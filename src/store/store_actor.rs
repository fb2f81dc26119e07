use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::error::StoreError;
use crate::models::location_record::{LocationRecord, NewLocation};
use crate::store::location_store::LocationStore;

enum StoreCommand {
    Append(NewLocation, oneshot::Sender<LocationRecord>),
    Recent(Option<usize>, oneshot::Sender<Vec<LocationRecord>>),
    Latest(oneshot::Sender<Option<LocationRecord>>),
    Len(oneshot::Sender<usize>),
}

/// Sole owner of the [`LocationStore`]. Commands are applied one at a time in
/// the order they arrive, so id assignment and eviction never interleave.
pub struct StoreActor {
    store: LocationStore,
    commands: mpsc::Receiver<StoreCommand>,
}

impl StoreActor {
    pub fn spawn(store: LocationStore) -> (StoreHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1024);
        let actor = Self { store, commands: rx };
        (StoreHandle { commands: tx }, tokio::spawn(actor.run_actor()))
    }

    pub async fn run_actor(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                StoreCommand::Append(fix, reply) => {
                    let record = self.store.append(fix);
                    info!("Location received: {:?}", record);
                    reply.send(record).ok();
                }
                StoreCommand::Recent(limit, reply) => {
                    reply.send(self.store.recent(limit)).ok();
                }
                StoreCommand::Latest(reply) => {
                    reply.send(self.store.latest()).ok();
                }
                StoreCommand::Len(reply) => {
                    reply.send(self.store.len()).ok();
                }
            }
        }
        debug!("Store channel closed");
    }
}

/// Cheap, cloneable access to the store actor.
#[derive(Clone)]
pub struct StoreHandle {
    commands: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    pub async fn append(&self, fix: NewLocation) -> Result<LocationRecord, StoreError> {
        self.request(|reply| StoreCommand::Append(fix, reply)).await
    }

    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<LocationRecord>, StoreError> {
        self.request(|reply| StoreCommand::Recent(limit, reply)).await
    }

    pub async fn latest(&self) -> Result<Option<LocationRecord>, StoreError> {
        self.request(StoreCommand::Latest).await
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        self.request(StoreCommand::Len).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> StoreCommand,
    ) -> Result<T, StoreError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| StoreError::Unavailable)?;
        response.await.map_err(|_| StoreError::Unavailable)
    }
}
