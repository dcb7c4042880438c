//! Single-writer actor.
//!
//! Every mutation is funnelled through one task that owns one connection and
//! runs each job inside an `IMMEDIATE` transaction. A job that returns an
//! error rolls back everything it wrote.

use std::any::Any;

use diesel::SqliteConnection;
use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use catalog_core::errors::{DatabaseError, Error, Result};

use super::DbPool;
use crate::errors::StorageError;

type AnyBox = Box<dyn Any + Send + 'static>;
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<AnyBox> + Send + 'static>;
type Envelope = (Job, oneshot::Sender<Result<AnyBox>>);

const QUEUE_CAPACITY: usize = 1024;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

fn writer_gone() -> Error {
    Error::Database(DatabaseError::Internal(
        "database writer is not running".to_string(),
    ))
}

impl WriteHandle {
    /// Runs `job` on the writer connection inside a transaction and waits
    /// for its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();
        let erased: Job = Box::new(move |conn| job(conn).map(|v| Box::new(v) as AnyBox));

        self.tx
            .send((erased, ret_tx))
            .await
            .map_err(|_| writer_gone())?;

        let boxed = ret_rx.await.map_err(|_| writer_gone())??;
        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "writer returned an unexpected result type".to_string(),
            ))
        })
    }
}

/// Spawns the writer task on the current tokio runtime.
///
/// The task holds one pooled connection for its whole life and stops when
/// every [`WriteHandle`] has been dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_CAPACITY);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer could not acquire a database connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            if reply_tx.send(result).is_err() {
                debug!("Write job finished after its caller went away");
            }
        }
        debug!("Database writer stopped");
    });

    WriteHandle { tx }
}
