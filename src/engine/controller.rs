//! The instance lifecycle controller.
//!
//! Orchestrates construction-from-configuration and mediates start / stop /
//! status / views / delete against single instances, translating catalog and
//! miner failures into the caller-visible [`Error`] taxonomy. Collaborator
//! failures are logged for diagnostics and still propagated - never
//! swallowed.

use std::sync::Arc;

use crate::engine::config::InstanceConfig;
use crate::engine::error::{Error, Result};
use crate::engine::instance::{InstanceId, MinerInstance};
use crate::engine::registry::InstanceRegistry;
use crate::miner::{MinerCatalog, MinerView, ViewOverrides};

/// Lifecycle controller over a catalog of miner types and the registry of
/// live instances. Cheap to share behind an `Arc`; every operation takes
/// `&self`.
#[derive(Debug)]
pub struct Engine {
    catalog: MinerCatalog,
    registry: InstanceRegistry,
}

impl Engine {
    pub fn new(catalog: MinerCatalog) -> Self {
        Self {
            catalog,
            registry: InstanceRegistry::new(),
        }
    }

    /// The miner type catalog this engine serves.
    pub fn catalog(&self) -> &MinerCatalog {
        &self.catalog
    }

    /// Create a new instance of `type_id` from `config`.
    ///
    /// Resolution, validation, construction, and configuration all happen
    /// before anything is registered; a failure at any step leaves the
    /// registry untouched and the partially built miner is dropped.
    ///
    /// Deliberately not idempotent: repeated calls with identical
    /// configuration create distinct instances.
    pub fn create(&self, type_id: &str, config: InstanceConfig) -> Result<InstanceId> {
        let descriptor = self
            .catalog
            .resolve(type_id)
            .ok_or_else(|| Error::UnknownMinerType(type_id.to_string()))?;

        let params = config
            .validate(&descriptor.parameters)
            .map_err(Error::InvalidConfiguration)?;

        let mut miner = descriptor.instantiate();
        miner.set_stream(&config.stream);
        miner.configure(&params).map_err(|e| {
            tracing::error!(miner = type_id, error = %e, "Miner configuration failed during creation");
            Error::ConstructionFailed(e)
        })?;

        let instance = Arc::new(MinerInstance::new(descriptor, config, miner));
        let id = instance.id().clone();
        self.registry.insert(instance);

        tracing::info!(instance = %id, miner = type_id, "Created miner instance");
        Ok(id)
    }

    /// Start the instance's miner.
    ///
    /// A miner-level failure leaves the instance registered and not running;
    /// the caller may retry or delete. Start on an already-running instance
    /// is governed solely by the miner's own state machine.
    pub fn start(&self, id: &InstanceId) -> Result<()> {
        let instance = self.lookup(id)?;

        instance.miner().start().map_err(|e| {
            tracing::error!(instance = %id, error = %e, "Miner failed to start");
            Error::StartFailed {
                id: id.clone(),
                source: e,
            }
        })?;

        tracing::info!(instance = %id, "Instance started");
        Ok(())
    }

    /// Stop the instance's miner. Stopping an already-stopped instance is a
    /// no-op success.
    pub fn stop(&self, id: &InstanceId) -> Result<()> {
        let instance = self.lookup(id)?;

        instance.miner().stop().map_err(|e| {
            tracing::error!(instance = %id, error = %e, "Miner failed to stop");
            Error::StopFailed {
                id: id.clone(),
                source: e,
            }
        })?;

        tracing::info!(instance = %id, "Instance stopped");
        Ok(())
    }

    /// Whether the instance's miner is running. Pure read, never mutates.
    pub fn status(&self, id: &InstanceId) -> Result<bool> {
        Ok(self.lookup(id)?.miner().is_running())
    }

    /// Current views from the instance's miner, with per-query overrides
    /// passed through verbatim. Output is returned uncached and unfiltered,
    /// in the miner's order.
    pub fn views(&self, id: &InstanceId, overrides: &ViewOverrides) -> Result<Vec<MinerView>> {
        Ok(self.lookup(id)?.miner().views(overrides))
    }

    /// Delete the instance, running or not.
    ///
    /// Removal is unconditional; afterwards the miner gets a best-effort
    /// stop so threads and timers are released. A stop failure is logged and
    /// does not fail the delete.
    pub fn delete(&self, id: &InstanceId) -> Result<()> {
        let instance = self
            .registry
            .remove(id)
            .ok_or_else(|| Error::InstanceNotFound(id.clone()))?;

        if instance.miner().is_running() {
            if let Err(e) = instance.miner().stop() {
                tracing::warn!(
                    instance = %id,
                    error = %e,
                    "Failed to stop miner during delete; its resources may leak"
                );
            }
        }

        tracing::info!(instance = %id, "Instance deleted");
        Ok(())
    }

    /// Point-in-time snapshot of all registered instances.
    pub fn list(&self) -> Vec<Arc<MinerInstance>> {
        self.registry.snapshot()
    }

    /// Best-effort stop of every running instance, used at shutdown.
    pub fn stop_all(&self) {
        let mut stopped = 0usize;
        for instance in self.registry.snapshot() {
            if instance.miner().is_running() {
                match instance.miner().stop() {
                    Ok(()) => stopped += 1,
                    Err(e) => {
                        tracing::warn!(instance = %instance.id(), error = %e, "Failed to stop instance");
                    },
                }
            }
        }
        if stopped > 0 {
            tracing::info!(count = stopped, "Stopped running instances");
        }
    }

    fn lookup(&self, id: &InstanceId) -> Result<Arc<MinerInstance>> {
        self.registry
            .get(id)
            .ok_or_else(|| Error::InstanceNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::miner::{
        Miner, MinerDescriptor, MinerError, MinerView, ParamKind, ParamSpec, ParamValues, ViewKind,
    };

    /// Well-behaved miner: start/stop flip a flag, views echo state.
    #[derive(Default)]
    struct EchoMiner {
        stream: String,
        window: i64,
        running: AtomicBool,
    }

    impl Miner for EchoMiner {
        fn set_stream(&mut self, stream: &str) {
            self.stream = stream.to_string();
        }
        fn configure(&mut self, params: &ParamValues) -> std::result::Result<(), MinerError> {
            self.window = params
                .get("window")
                .and_then(crate::miner::ParamValue::as_integer)
                .unwrap_or(0);
            Ok(())
        }
        fn start(&self) -> std::result::Result<(), MinerError> {
            self.running.store(true, Ordering::SeqCst);
            Ok(())
        }
        fn stop(&self) -> std::result::Result<(), MinerError> {
            self.running.store(false, Ordering::SeqCst);
            Ok(())
        }
        fn is_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }
        fn views(&self, _overrides: &ViewOverrides) -> Vec<MinerView> {
            vec![MinerView::new(
                "state",
                ViewKind::Raw,
                json!({
                    "stream": self.stream,
                    "window": self.window,
                    "running": self.is_running(),
                }),
            )]
        }
    }

    /// Miner whose start always fails at the miner level.
    #[derive(Default)]
    struct FaultyMiner;

    impl Miner for FaultyMiner {
        fn set_stream(&mut self, _stream: &str) {}
        fn configure(&mut self, _params: &ParamValues) -> std::result::Result<(), MinerError> {
            Ok(())
        }
        fn start(&self) -> std::result::Result<(), MinerError> {
            Err(MinerError::Stream("malformed stream".into()))
        }
        fn stop(&self) -> std::result::Result<(), MinerError> {
            Ok(())
        }
        fn is_running(&self) -> bool {
            false
        }
        fn views(&self, _overrides: &ViewOverrides) -> Vec<MinerView> {
            vec![]
        }
    }

    /// Miner whose configure always fails.
    #[derive(Default)]
    struct UnbuildableMiner;

    impl Miner for UnbuildableMiner {
        fn set_stream(&mut self, _stream: &str) {}
        fn configure(&mut self, _params: &ParamValues) -> std::result::Result<(), MinerError> {
            Err(MinerError::Configuration("precondition violated".into()))
        }
        fn start(&self) -> std::result::Result<(), MinerError> {
            Ok(())
        }
        fn stop(&self) -> std::result::Result<(), MinerError> {
            Ok(())
        }
        fn is_running(&self) -> bool {
            false
        }
        fn views(&self, _overrides: &ViewOverrides) -> Vec<MinerView> {
            vec![]
        }
    }

    fn test_catalog() -> MinerCatalog {
        MinerCatalog::new()
            .register(MinerDescriptor::new(
                "echo",
                "Echo",
                "well-behaved test miner",
                vec![ParamSpec::required("window", ParamKind::Integer)],
                Box::new(|| Box::new(EchoMiner::default())),
            ))
            .register(MinerDescriptor::new(
                "faulty",
                "Faulty",
                "start always fails",
                vec![],
                Box::new(|| Box::new(FaultyMiner)),
            ))
            .register(MinerDescriptor::new(
                "unbuildable",
                "Unbuildable",
                "configure always fails",
                vec![],
                Box::new(|| Box::new(UnbuildableMiner)),
            ))
    }

    fn echo_config() -> InstanceConfig {
        InstanceConfig::new("orders").with_param("window", json!(100))
    }

    #[test]
    fn test_create_then_status_is_not_running() {
        let engine = Engine::new(test_catalog());
        let id = engine.create("echo", echo_config()).unwrap();
        assert!(!engine.status(&id).unwrap());
    }

    #[test]
    fn test_create_unknown_type() {
        let engine = Engine::new(test_catalog());
        let err = engine.create("ghost", echo_config()).unwrap_err();
        assert!(matches!(err, Error::UnknownMinerType(ref t) if t == "ghost"));
        assert!(engine.list().is_empty());
    }

    #[test]
    fn test_create_missing_required_parameter() {
        let engine = Engine::new(test_catalog());
        let err = engine
            .create("echo", InstanceConfig::new("orders"))
            .unwrap_err();

        match err {
            Error::InvalidConfiguration(faults) => {
                assert_eq!(faults.len(), 1);
                assert_eq!(faults[0].name, "window");
            },
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
        assert!(engine.list().is_empty());
    }

    #[test]
    fn test_construction_failure_registers_nothing() {
        let engine = Engine::new(test_catalog());
        let err = engine
            .create("unbuildable", InstanceConfig::new("orders"))
            .unwrap_err();

        assert!(matches!(err, Error::ConstructionFailed(_)));
        assert_eq!(err.code(), "miner_construction_failed");
        assert!(engine.list().is_empty());
    }

    #[test]
    fn test_create_is_not_idempotent() {
        let engine = Engine::new(test_catalog());
        let a = engine.create("echo", echo_config()).unwrap();
        let b = engine.create("echo", echo_config()).unwrap();

        assert_ne!(a, b);
        assert_eq!(engine.list().len(), 2);
    }

    #[test]
    fn test_round_trip_start_status_stop() {
        let engine = Engine::new(test_catalog());
        let id = engine.create("echo", echo_config()).unwrap();

        engine.start(&id).unwrap();
        assert!(engine.status(&id).unwrap());

        engine.stop(&id).unwrap();
        assert!(!engine.status(&id).unwrap());
    }

    #[test]
    fn test_start_unknown_id_leaves_registry_untouched() {
        let engine = Engine::new(test_catalog());
        let _ = engine.create("echo", echo_config()).unwrap();

        let err = engine.start(&InstanceId::from("missing")).unwrap_err();
        assert!(matches!(err, Error::InstanceNotFound(_)));
        assert_eq!(engine.list().len(), 1);
    }

    #[test]
    fn test_start_failure_keeps_instance_registered() {
        let engine = Engine::new(test_catalog());
        let id = engine
            .create("faulty", InstanceConfig::new("orders"))
            .unwrap();

        let err = engine.start(&id).unwrap_err();
        assert!(matches!(err, Error::StartFailed { .. }));

        // Instance persists for inspection, retry, or deletion.
        assert!(!engine.status(&id).unwrap());
        assert_eq!(engine.list().len(), 1);
        engine.delete(&id).unwrap();
    }

    #[test]
    fn test_stop_on_stopped_instance_is_noop_success() {
        let engine = Engine::new(test_catalog());
        let id = engine.create("echo", echo_config()).unwrap();

        engine.stop(&id).unwrap();
        engine.stop(&id).unwrap();
        assert!(!engine.status(&id).unwrap());
    }

    #[test]
    fn test_views_on_unstarted_instance() {
        let engine = Engine::new(test_catalog());
        let id = engine.create("echo", echo_config()).unwrap();

        let views = engine.views(&id, &ViewOverrides::new()).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].payload["running"], false);
        assert_eq!(views[0].payload["window"], 100);
        assert_eq!(views[0].payload["stream"], "orders");
    }

    #[test]
    fn test_delete_is_idempotent_in_effect() {
        let engine = Engine::new(test_catalog());
        let id = engine.create("echo", echo_config()).unwrap();

        engine.delete(&id).unwrap();
        let err = engine.delete(&id).unwrap_err();
        assert!(matches!(err, Error::InstanceNotFound(_)));
    }

    #[test]
    fn test_delete_running_instance_stops_it() {
        // The factory shares one stop-observation flag across instances so
        // the test can see the miner being stopped after removal.
        let observed_running = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&observed_running);

        struct FlaggedMiner {
            running: Arc<AtomicBool>,
        }
        impl Miner for FlaggedMiner {
            fn set_stream(&mut self, _stream: &str) {}
            fn configure(&mut self, _params: &ParamValues) -> std::result::Result<(), MinerError> {
                Ok(())
            }
            fn start(&self) -> std::result::Result<(), MinerError> {
                self.running.store(true, Ordering::SeqCst);
                Ok(())
            }
            fn stop(&self) -> std::result::Result<(), MinerError> {
                self.running.store(false, Ordering::SeqCst);
                Ok(())
            }
            fn is_running(&self) -> bool {
                self.running.load(Ordering::SeqCst)
            }
            fn views(&self, _overrides: &ViewOverrides) -> Vec<MinerView> {
                vec![]
            }
        }

        let catalog = MinerCatalog::new().register(MinerDescriptor::new(
            "flagged",
            "Flagged",
            "records running state in a shared flag",
            vec![],
            Box::new(move || {
                Box::new(FlaggedMiner {
                    running: Arc::clone(&flag),
                })
            }),
        ));

        let engine = Engine::new(catalog);
        let id = engine
            .create("flagged", InstanceConfig::new("orders"))
            .unwrap();

        engine.start(&id).unwrap();
        assert!(observed_running.load(Ordering::SeqCst));

        engine.delete(&id).unwrap();
        assert!(engine.list().is_empty());
        // Best-effort stop ran after removal.
        assert!(!observed_running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_concurrent_creates_yield_distinct_instances() {
        const N: usize = 16;

        let engine = Engine::new(test_catalog());
        let ids = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for i in 0..N {
                let engine = &engine;
                let ids = &ids;
                scope.spawn(move || {
                    let config = InstanceConfig::new(format!("stream-{i}"))
                        .with_param("window", json!(i as i64));
                    let id = engine.create("echo", config).unwrap();
                    ids.lock().push(id);
                });
            }
        });

        let mut ids = ids.into_inner();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        assert_eq!(ids.len(), N, "ids must be unique");
        assert_eq!(engine.list().len(), N, "no lost or duplicated entries");
    }

    #[test]
    fn test_concurrent_delete_and_status_race_is_safe() {
        let engine = Arc::new(Engine::new(test_catalog()));
        let id = engine.create("echo", echo_config()).unwrap();
        engine.start(&id).unwrap();

        std::thread::scope(|scope| {
            let status_engine = Arc::clone(&engine);
            let status_id = id.clone();
            scope.spawn(move || {
                // Either outcome is legal; it must just never panic.
                let _ = status_engine.status(&status_id);
            });

            let delete_engine = Arc::clone(&engine);
            let delete_id = id.clone();
            scope.spawn(move || {
                let _ = delete_engine.delete(&delete_id);
            });
        });

        assert!(engine.list().is_empty());
    }
}
