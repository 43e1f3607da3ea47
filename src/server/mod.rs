//! Session gateway: connections, intent dispatch and broadcasts.
//!
//! Every inbound intent runs to completion against the table under one lock,
//! and its snapshots are queued to every connection before the lock is
//! released, so all clients see transitions in the same order.

use alloc::sync::Arc;
use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::sync::Mutex;
use crate::table::{FollowUp, Intent, PlayerId, Table, Transition};

pub mod config;
pub mod protocol;
pub mod ws;

pub use config::ServerConfig;
pub use protocol::{BetAmount, CardIndex, ClientMessage, ServerMessage};

/// Sending half of a connection's outbound queue.
pub type Outbound = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug)]
struct Inner {
    table: Table,
    connections: HashMap<PlayerId, Outbound>,
    next_id: u64,
}

impl Inner {
    fn send(&self, id: PlayerId, message: ServerMessage) {
        if let Some(tx) = self.connections.get(&id) {
            // A closed receiver means the connection is going away; its
            // disconnect is handled separately.
            let _ = tx.send(message);
        }
    }

    fn broadcast(&self, transition: &Transition) {
        for snapshot in &transition.snapshots {
            for tx in self.connections.values() {
                let _ = tx.send(ServerMessage::GameState(snapshot.clone()));
            }
        }
    }
}

/// Owns the table and every connected client.
#[derive(Debug)]
pub struct Gateway {
    inner: Mutex<Inner>,
}

impl Gateway {
    /// Creates a gateway hosting `table`.
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self {
            inner: Mutex::new(Inner {
                table,
                connections: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Registers a new connection and returns its ID and outbound queue.
    ///
    /// The connection receives the current table state straight away.
    pub fn connect(&self) -> (PlayerId, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();

        let id = PlayerId(inner.next_id);
        inner.next_id += 1;

        let _ = tx.send(ServerMessage::GameState(inner.table.snapshot()));
        inner.connections.insert(id, tx);
        info!(connection = %id, connections = inner.connections.len(), "client connected");

        (id, rx)
    }

    /// Handles one inbound frame from connection `id`.
    ///
    /// Accepted intents are broadcast to everyone; rejections go back to the
    /// sender only.
    pub fn handle(self: &Arc<Self>, id: PlayerId, message: ClientMessage) {
        let mut inner = self.inner.lock();

        let result = message.into_intent().and_then(|intent| {
            let joining = matches!(intent, Intent::Join { .. });
            let transition = inner.table.apply(id, intent)?;
            Ok((joining, transition))
        });

        match result {
            Ok((joining, transition)) => {
                if joining {
                    if let Some(player) = inner.table.player(id) {
                        let joined = ServerMessage::Joined {
                            player_id: id,
                            player_name: player.name().to_string(),
                        };
                        inner.send(id, joined);
                    }
                }

                inner.broadcast(&transition);
                drop(inner);

                if let Some(follow_up) = transition.follow_up {
                    self.schedule(follow_up);
                }
            }
            Err(err) => {
                debug!(connection = %id, code = err.code(), %err, "intent rejected");
                inner.send(id, err.into());
            }
        }
    }

    /// Removes connection `id`, releasing its seat.
    pub fn disconnect(&self, id: PlayerId) {
        let mut inner = self.inner.lock();

        inner.connections.remove(&id);
        let transition = inner.table.disconnect(id);
        inner.broadcast(&transition);

        info!(connection = %id, connections = inner.connections.len(), "client disconnected");
    }

    /// Returns the number of open connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.inner.lock().connections.len()
    }

    /// Runs `f` against the hosted table.
    pub fn with_table<R>(&self, f: impl FnOnce(&Table) -> R) -> R {
        f(&self.inner.lock().table)
    }

    fn schedule(self: &Arc<Self>, follow_up: FollowUp) {
        match follow_up {
            FollowUp::SpecialChance {
                player,
                ticket,
                delay,
            } => {
                let gateway = Arc::clone(self);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    gateway.resolve_special_chance(player, ticket);
                });
            }
        }
    }

    fn resolve_special_chance(&self, player: PlayerId, ticket: u64) {
        let mut inner = self.inner.lock();

        match inner.table.resolve_special_chance(player, ticket) {
            Ok(transition) => inner.broadcast(&transition),
            Err(err) => {
                warn!(connection = %player, ticket, %err, "special chance failed");
                inner.send(player, err.into());
            }
        }
    }
}
