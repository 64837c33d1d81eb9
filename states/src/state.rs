//! Typed update channel.
//!
//! A [`StateUpdater`] publishes every new value of some state; a [`StateReader`] observes them
//! in order. Both ends are `Send`, so readers may live on another task.

use flume::{Receiver, Sender, TryRecvError};

use crate::Error;

pub struct StateUpdater<T> {
    send: Sender<T>,
}

impl<T> Clone for StateUpdater<T> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<T> std::fmt::Debug for StateUpdater<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateUpdater")
            .field("readers", &self.send.receiver_count())
            .finish()
    }
}

impl<T> StateUpdater<T> {
    /// Publish `state`. Fails once every reader has been dropped.
    pub fn set(&self, state: T) -> Result<(), Error> {
        self.send
            .send(state)
            .map_err(|_disconnected| Error::disconnected("every reader was dropped"))
    }

    pub fn is_connected(&self) -> bool {
        !self.send.is_disconnected()
    }
}

pub struct StateReader<T> {
    recv: Receiver<T>,
}

impl<T> std::fmt::Debug for StateReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateReader")
            .field("queued", &self.recv.len())
            .finish()
    }
}

impl<T> StateReader<T> {
    /// Next published value, if one is queued.
    pub fn read(&self) -> Option<T> {
        match self.recv.try_recv() {
            Ok(state) => Some(state),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Every queued value, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.recv.drain().collect()
    }

    /// Wait for the next published value. `None` once every updater is dropped.
    pub async fn changed(&self) -> Option<T> {
        self.recv.recv_async().await.ok()
    }
}

/// Create a connected updater/reader pair.
pub fn state_channel<T>() -> (StateUpdater<T>, StateReader<T>) {
    let (send, recv) = flume::unbounded();
    (StateUpdater { send }, StateReader { recv })
}
