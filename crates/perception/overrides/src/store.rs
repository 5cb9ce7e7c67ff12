//! Override arbitration store
//!
//! Three layers of manual overrides keyed by [`PairKey`]:
//!
//! - **roll**: keyed by pair and [`RollId`], one attempt
//! - **dialog**: keyed by pair, one dialog session
//! - **ambient** (`popup`): keyed by pair, until changed
//!
//! Lookups walk the layers in that order; the first hit wins. Precedence
//! never depends on insertion order. Entries older than the configured TTL
//! are dropped by [`cleanup`](OverrideArbitrationStore::cleanup), which a
//! background task runs on a fixed period until the store is destroyed or
//! dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Duration;
use parking_lot::Mutex;
use perception_types::{ConfigResult, DetectionState, OverrideStoreConfig, PairKey, RollId};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::record::{Override, OverrideLayer};

#[derive(Debug, Default)]
struct Layers {
    roll: BTreeMap<(PairKey, RollId), Override>,
    dialog: HashMap<PairKey, Override>,
    ambient: HashMap<PairKey, Override>,
}

impl Layers {
    fn len(&self) -> usize {
        self.roll.len() + self.dialog.len() + self.ambient.len()
    }

    fn clear(&mut self) {
        self.roll.clear();
        self.dialog.clear();
        self.ambient.clear();
    }

    fn pair_layer(&mut self, layer: OverrideLayer) -> Option<&mut HashMap<PairKey, Override>> {
        match layer {
            OverrideLayer::Roll => None,
            OverrideLayer::Dialog => Some(&mut self.dialog),
            OverrideLayer::Ambient => Some(&mut self.ambient),
        }
    }

    /// Highest-priority layer holding an entry for the pair
    fn resolve(&self, pair: &PairKey, roll_id: Option<&RollId>) -> Option<OverrideLayer> {
        OverrideLayer::PRECEDENCE
            .into_iter()
            .find(|layer| match layer {
                OverrideLayer::Roll => roll_id
                    .map(|id| self.roll.contains_key(&(pair.clone(), id.clone())))
                    .unwrap_or(false),
                OverrideLayer::Dialog => self.dialog.contains_key(pair),
                OverrideLayer::Ambient => self.ambient.contains_key(pair),
            })
    }

    fn get(
        &self,
        layer: OverrideLayer,
        pair: &PairKey,
        roll_id: Option<&RollId>,
    ) -> Option<&Override> {
        match layer {
            OverrideLayer::Roll => self.roll.get(&(pair.clone(), roll_id?.clone())),
            OverrideLayer::Dialog => self.dialog.get(pair),
            OverrideLayer::Ambient => self.ambient.get(pair),
        }
    }

    fn remove(
        &mut self,
        layer: OverrideLayer,
        pair: &PairKey,
        roll_id: Option<&RollId>,
    ) -> Option<Override> {
        match layer {
            OverrideLayer::Roll => self.roll.remove(&(pair.clone(), roll_id?.clone())),
            OverrideLayer::Dialog => self.dialog.remove(pair),
            OverrideLayer::Ambient => self.ambient.remove(pair),
        }
    }
}

/// Layered store of manual detection overrides
#[derive(Debug)]
pub struct OverrideArbitrationStore {
    config: OverrideStoreConfig,
    clock: Arc<dyn Clock>,
    layers: Mutex<Layers>,
    cleanup_handle: Mutex<Option<JoinHandle<()>>>,
    destroyed: AtomicBool,
}

impl OverrideArbitrationStore {
    /// Create a store on the system clock. No background task is started.
    pub fn new(config: OverrideStoreConfig) -> ConfigResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: OverrideStoreConfig, clock: Arc<dyn Clock>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            layers: Mutex::new(Layers::default()),
            cleanup_handle: Mutex::new(None),
            destroyed: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &OverrideStoreConfig {
        &self.config
    }

    fn ttl(&self) -> Duration {
        Duration::seconds(self.config.ttl_secs as i64)
    }

    /// Record an override.
    ///
    /// Nothing happens when `state == original_state`; existing entries
    /// are left as they are. The roll layer requires a roll id. Returns
    /// whether an entry was stored.
    pub fn set(
        &self,
        layer: OverrideLayer,
        pair: &PairKey,
        state: DetectionState,
        original_state: DetectionState,
        roll_id: Option<RollId>,
    ) -> bool {
        if state == original_state {
            return false;
        }

        let mut layers = self.layers.lock();

        let record = Override {
            state,
            original_state,
            timestamp: self.clock.now(),
            source: layer,
            roll_id: None,
        };

        match layer {
            OverrideLayer::Roll => {
                let Some(roll_id) = roll_id else {
                    warn!(pair = %pair, "Roll override without a roll id ignored");
                    return false;
                };
                layers.roll.insert(
                    (pair.clone(), roll_id.clone()),
                    Override {
                        roll_id: Some(roll_id),
                        ..record
                    },
                );
            }
            OverrideLayer::Dialog => {
                layers.dialog.insert(pair.clone(), record);
            }
            OverrideLayer::Ambient => {
                layers.ambient.insert(pair.clone(), record);
            }
        }

        debug!(
            pair = %pair,
            layer = %layer,
            state = %state,
            original = %original_state,
            "Override recorded"
        );
        true
    }

    /// Highest-priority override for the pair, without removing it
    pub fn get(&self, pair: &PairKey, roll_id: Option<&RollId>) -> Option<Override> {
        let layers = self.layers.lock();
        let layer = layers.resolve(pair, roll_id)?;
        layers.get(layer, pair, roll_id).cloned()
    }

    pub fn has(&self, pair: &PairKey, roll_id: Option<&RollId>) -> bool {
        self.get(pair, roll_id).is_some()
    }

    /// Like [`get`](Self::get), removing the returned entry unless
    /// `delete_on_consume` is false
    pub fn consume(
        &self,
        pair: &PairKey,
        roll_id: Option<&RollId>,
        delete_on_consume: bool,
    ) -> Option<Override> {
        let mut layers = self.layers.lock();
        let layer = layers.resolve(pair, roll_id)?;

        let record = if delete_on_consume {
            layers.remove(layer, pair, roll_id)
        } else {
            layers.get(layer, pair, roll_id).cloned()
        };

        if record.is_some() {
            debug!(pair = %pair, layer = %layer, delete_on_consume, "Override consumed");
        }
        record
    }

    /// Remove and return the dialog entry, ignoring the other layers
    pub fn consume_dialog_override(&self, pair: &PairKey) -> Option<Override> {
        self.consume_layer(OverrideLayer::Dialog, pair)
    }

    /// Remove and return the ambient (`popup`) entry, ignoring the other layers
    pub fn consume_popup_override(&self, pair: &PairKey) -> Option<Override> {
        self.consume_layer(OverrideLayer::Ambient, pair)
    }

    fn consume_layer(&self, layer: OverrideLayer, pair: &PairKey) -> Option<Override> {
        let mut layers = self.layers.lock();
        layers.pair_layer(layer)?.remove(pair)
    }

    /// Drop the pair's dialog and ambient entries and all of its rolls
    pub fn clear(&self, pair: &PairKey) {
        let mut layers = self.layers.lock();
        let before = layers.len();

        layers.dialog.remove(pair);
        layers.ambient.remove(pair);
        layers.roll.retain(|(key, _), _| key != pair);

        let removed = before - layers.len();
        if removed > 0 {
            debug!(pair = %pair, removed, "Cleared overrides for pair");
        }
    }

    pub fn clear_all(&self) {
        self.layers.lock().clear();
    }

    /// Remove every entry older than the TTL. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl();

        let mut layers = self.layers.lock();
        let before = layers.len();

        layers.roll.retain(|_, record| !record.is_expired(now, ttl));
        layers.dialog.retain(|_, record| !record.is_expired(now, ttl));
        layers.ambient.retain(|_, record| !record.is_expired(now, ttl));

        let removed = before - layers.len();
        if removed > 0 {
            debug!(removed, remaining = layers.len(), "Expired overrides removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.layers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start the recurring cleanup task on the current tokio runtime.
    ///
    /// The task holds only a weak reference and stops once the store is
    /// gone. Returns false when there is no runtime, the store was
    /// destroyed, or a task is already running.
    pub fn start_cleanup_task(self: &Arc<Self>) -> bool {
        if self.destroyed.load(Ordering::SeqCst) {
            warn!("Cleanup task not started: store destroyed");
            return false;
        }

        let mut handle = self.cleanup_handle.lock();
        if handle.is_some() {
            return false;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("Cleanup task not started: no tokio runtime");
            return false;
        };

        let period = std::time::Duration::from_secs(self.config.cleanup_interval_secs);
        let store = Arc::downgrade(self);

        *handle = Some(runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.cleanup();
            }
        }));

        info!(
            interval_secs = self.config.cleanup_interval_secs,
            ttl_secs = self.config.ttl_secs,
            "Override cleanup task started"
        );
        true
    }

    pub fn cleanup_task_active(&self) -> bool {
        self.cleanup_handle.lock().is_some()
    }

    /// Cancel the cleanup task and drop every override. Idempotent.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.cleanup_handle.lock().take() {
            handle.abort();
        }
        self.clear_all();

        info!("Override store destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl Drop for OverrideArbitrationStore {
    fn drop(&mut self) {
        if let Some(handle) = self.cleanup_handle.get_mut().take() {
            handle.abort();
        }
    }
}
