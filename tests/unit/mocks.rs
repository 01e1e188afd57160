//! Shared mock infrastructure for unit tests.
//!
//! Provides canned port implementations and report builders so each test
//! file doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used)]
#![allow(dead_code)] // not every test module uses every mock

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use agentci::application::ports::{
    ArtifactUploader, ControlPlane, DescriptorStore, Notifier, ProvisionedAgent, VcsPublisher,
};
use agentci::domain::descriptor::AgentDescriptor;
use agentci::domain::secrets::SecretEntry;
use agentci::domain::status::{AgentStatusReport, RegionalDeployment};

// ── Shared call journal ───────────────────────────────────────────────────────

pub type Journal = Arc<Mutex<Vec<&'static str>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorded(journal: &Journal) -> Vec<&'static str> {
    journal.lock().expect("journal lock").clone()
}

fn record(journal: &Journal, step: &'static str) {
    journal.lock().expect("journal lock").push(step);
}

// ── Builders ──────────────────────────────────────────────────────────────────

pub fn report(agent_id: &str, deployments: &[(&str, &str)]) -> AgentStatusReport {
    AgentStatusReport {
        agent_id: agent_id.to_string(),
        deployments: deployments
            .iter()
            .map(|(region, status)| RegionalDeployment {
                region: (*region).to_string(),
                status: (*status).to_string(),
            })
            .collect(),
    }
}

pub fn registered_descriptor(id: &str) -> AgentDescriptor {
    let mut descriptor = AgentDescriptor::new("myproj");
    descriptor.agent.id = id.to_string();
    descriptor
}

// ── Mock: control plane with fixed answers ────────────────────────────────────

pub struct ControlPlaneMock {
    journal: Journal,
    pub provisioned: ProvisionedAgent,
    pub agents: Vec<AgentStatusReport>,
    pub fail_create: bool,
}

impl ControlPlaneMock {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            provisioned: ProvisionedAgent {
                agent_id: "CA_new".to_string(),
                presigned_url: "https://uploads.example.io/CA_new".to_string(),
            },
            agents: Vec::new(),
            fail_create: false,
        }
    }

    pub fn with_agents(journal: Journal, agents: Vec<AgentStatusReport>) -> Self {
        let mut mock = Self::new(journal);
        mock.agents = agents;
        mock
    }
}

impl ControlPlane for ControlPlaneMock {
    async fn create_agent(&self, _secrets: &[SecretEntry]) -> Result<ProvisionedAgent> {
        record(&self.journal, "create");
        if self.fail_create {
            anyhow::bail!("control plane create returned 500");
        }
        Ok(self.provisioned.clone())
    }

    async fn deploy_agent(
        &self,
        _agent_id: &str,
        _secrets: &[SecretEntry],
    ) -> Result<ProvisionedAgent> {
        record(&self.journal, "deploy");
        Ok(self.provisioned.clone())
    }

    async fn list_agents(&self, _agent_id: &str) -> Result<Vec<AgentStatusReport>> {
        record(&self.journal, "list");
        Ok(self.agents.clone())
    }

    async fn trigger_build(&self, _agent_id: &str) -> Result<()> {
        record(&self.journal, "build");
        Ok(())
    }
}

// ── Mock: scripted status sequence for the poller ─────────────────────────────

#[derive(Clone)]
pub enum ListStep {
    Agents(Vec<AgentStatusReport>),
    Fail(&'static str),
}

/// Answers `list_agents` from a queue of steps, repeating `fallback` once
/// the queue is drained. Other methods are not expected.
pub struct SequenceControlPlane {
    steps: Mutex<VecDeque<ListStep>>,
    fallback: ListStep,
    polls: Mutex<usize>,
}

impl SequenceControlPlane {
    pub fn new(steps: Vec<ListStep>, fallback: ListStep) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback,
            polls: Mutex::new(0),
        }
    }

    pub fn polls(&self) -> usize {
        *self.polls.lock().expect("polls lock")
    }
}

impl ControlPlane for SequenceControlPlane {
    async fn create_agent(&self, _secrets: &[SecretEntry]) -> Result<ProvisionedAgent> {
        anyhow::bail!("not expected in this test")
    }

    async fn deploy_agent(
        &self,
        _agent_id: &str,
        _secrets: &[SecretEntry],
    ) -> Result<ProvisionedAgent> {
        anyhow::bail!("not expected in this test")
    }

    async fn list_agents(&self, _agent_id: &str) -> Result<Vec<AgentStatusReport>> {
        *self.polls.lock().expect("polls lock") += 1;
        let step = self
            .steps
            .lock()
            .expect("steps lock")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match step {
            ListStep::Agents(agents) => Ok(agents),
            ListStep::Fail(message) => anyhow::bail!(message),
        }
    }

    async fn trigger_build(&self, _agent_id: &str) -> Result<()> {
        anyhow::bail!("not expected in this test")
    }
}

// ── Mock: in-memory descriptor store ──────────────────────────────────────────

pub struct MemoryDescriptorStore {
    dir: PathBuf,
    journal: Option<Journal>,
    inner: Mutex<Option<AgentDescriptor>>,
}

impl MemoryDescriptorStore {
    pub fn empty() -> Self {
        Self {
            dir: PathBuf::from("/work"),
            journal: None,
            inner: Mutex::new(None),
        }
    }

    pub fn with(descriptor: AgentDescriptor) -> Self {
        let store = Self::empty();
        *store.inner.lock().expect("store lock") = Some(descriptor);
        store
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn descriptor(&self) -> Option<AgentDescriptor> {
        self.inner.lock().expect("store lock").clone()
    }
}

impl DescriptorStore for MemoryDescriptorStore {
    async fn load(&self) -> Result<Option<AgentDescriptor>> {
        Ok(self.inner.lock().expect("store lock").clone())
    }

    async fn save(&self, descriptor: &AgentDescriptor) -> Result<()> {
        if let Some(journal) = &self.journal {
            record(journal, "save");
        }
        *self.inner.lock().expect("store lock") = Some(descriptor.clone());
        Ok(())
    }

    fn dir(&self) -> &Path {
        &self.dir
    }
}

// ── Mock: artifact uploader ───────────────────────────────────────────────────

pub struct UploaderMock {
    journal: Journal,
    pub fail: bool,
    pub uploads: Mutex<Vec<(PathBuf, String)>>,
}

impl UploaderMock {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail: false,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

impl ArtifactUploader for UploaderMock {
    async fn upload_workdir(&self, dir: &Path, presigned_url: &str) -> Result<()> {
        record(&self.journal, "upload");
        if self.fail {
            anyhow::bail!("artifact upload returned 503");
        }
        self.uploads
            .lock()
            .expect("uploads lock")
            .push((dir.to_path_buf(), presigned_url.to_string()));
        Ok(())
    }
}

// ── Mock: notifier spy ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct NotifierSpy {
    pub fail: bool,
    pub messages: Mutex<Vec<String>>,
}

impl NotifierSpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }
}

impl Notifier for NotifierSpy {
    async fn notify(&self, message: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("notification endpoint returned 500");
        }
        self.messages
            .lock()
            .expect("messages lock")
            .push(message.to_string());
        Ok(())
    }
}

// ── Mock: version control spy ─────────────────────────────────────────────────

pub struct VcsSpy {
    journal: Journal,
}

impl VcsSpy {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl VcsPublisher for VcsSpy {
    async fn publish_descriptor(&self, _dir: &Path) -> Result<()> {
        record(&self.journal, "publish");
        Ok(())
    }
}
