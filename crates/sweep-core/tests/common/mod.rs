#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use sweep_core::{LaunchRequest, ProcessHandle, Runner, RunnerError};
use sweep_model::{RunConfig, RunSpec, Slot};

/// What a fake process does once spawned.
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// Exit with `code` after `after`.
    Exit { after: Duration, code: i32 },
    /// Never exit on its own.
    Hang,
    /// Fail to spawn.
    SpawnError,
}

type Plan = dyn Fn(usize) -> Behaviour + Send + Sync;

/// In-memory runner recording every spawn.
pub struct FakeRunner {
    plan: Box<Plan>,
    spawned: Mutex<Vec<(usize, Vec<String>)>>,
    terminated: Arc<Mutex<Vec<usize>>>,
}

impl FakeRunner {
    pub fn new(plan: impl Fn(usize) -> Behaviour + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            plan: Box::new(plan),
            spawned: Mutex::new(Vec::new()),
            terminated: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Every job exits with `0` after `after`.
    pub fn ok_after(after: Duration) -> Arc<Self> {
        Self::new(move |_| Behaviour::Exit { after, code: 0 })
    }

    /// `(job, argv)` of every successful or failed spawn attempt, in order.
    pub fn spawned(&self) -> Vec<(usize, Vec<String>)> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }

    pub fn terminated(&self) -> Vec<usize> {
        self.terminated.lock().unwrap().clone()
    }
}

impl Runner for FakeRunner {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn spawn(&self, req: &LaunchRequest<'_>) -> Result<Box<dyn ProcessHandle>, RunnerError> {
        self.spawned
            .lock()
            .unwrap()
            .push((req.job, req.argv.to_vec()));

        match (self.plan)(req.job) {
            Behaviour::SpawnError => Err(RunnerError::Spawn("no such file".into())),
            behaviour => Ok(Box::new(FakeProcess {
                job: req.job,
                behaviour,
                terminated: Arc::clone(&self.terminated),
            })),
        }
    }
}

struct FakeProcess {
    job: usize,
    behaviour: Behaviour,
    terminated: Arc<Mutex<Vec<usize>>>,
}

#[async_trait]
impl ProcessHandle for FakeProcess {
    fn id(&self) -> Option<u32> {
        None
    }

    async fn wait(&mut self) -> Result<Option<i32>, RunnerError> {
        match self.behaviour {
            Behaviour::Exit { after, code } => {
                tokio::time::sleep(after).await;
                Ok(Some(code))
            }
            _ => std::future::pending().await,
        }
    }

    async fn terminate(&mut self) -> Result<(), RunnerError> {
        self.terminated.lock().unwrap().push(self.job);
        Ok(())
    }
}

/// Spec with `slots` resource slots and `jobs` combinations of key `e1`.
pub fn spec(slots: usize, jobs: usize, tweak: impl FnOnce(&mut RunConfig)) -> RunSpec {
    let mut cfg = RunConfig {
        engine_exe: PathBuf::from("/opt/engine/engine"),
        template: PathBuf::from("/runs/model_[e1].tcf"),
        batch_flags: "-b".to_string(),
        slots: (0..slots).map(|i| Slot::Single(format!("-pu{i}"))).collect(),
        values: BTreeMap::from([(
            "e1".to_string(),
            (1..=jobs).map(|i| format!("{i:02}")).collect(),
        )]),
        ..Default::default()
    };
    tweak(&mut cfg);
    RunSpec::from_config_unchecked(cfg).unwrap()
}

/// Poll `cond` until it holds or two seconds pass.
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
