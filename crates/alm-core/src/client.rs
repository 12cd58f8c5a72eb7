//! Entity CRUD facade.
//!
//! Every operation maps to exactly one HTTP call against a URL the
//! connector builds from an entity kind and an identifier.

use tracing::{debug, instrument};

use crate::Result;
use crate::auth::SessionEstablisher;
use crate::error::InvalidInputError;
use crate::http::{CONTENT_TYPE_OCTET_STREAM, RestRequest};
use crate::model::{
    Attachment, Collection, Entity, Run, RunStep, RunSteps, Test, TestInstance, TestInstances,
    TestSet, TypedEntity,
};
use crate::traits::Connector;
use crate::types::EntityKind;

const RUN_STEPS: &str = "run-steps";
const ATTACHMENTS: &str = "attachments";
const SLUG: &str = "Slug";

/// The entity an attachment hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOwner {
    Run(String),
    RunStep(String),
}

impl AttachmentOwner {
    pub fn kind(&self) -> EntityKind {
        match self {
            AttachmentOwner::Run(_) => EntityKind::Run,
            AttachmentOwner::RunStep(_) => EntityKind::RunStep,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AttachmentOwner::Run(id) | AttachmentOwner::RunStep(id) => id,
        }
    }
}

/// Typed read/create/update calls for test-management entities.
///
/// The client does not authenticate; establish a session first with
/// [`AlmClient::session`] (or any [`SessionEstablisher`] sharing the same
/// connector).
///
/// # Example
///
/// ```no_run
/// use alm_core::{AlmClient, Connector, Credentials};
///
/// # async fn example<C: Connector + Clone>(connector: C) -> alm_core::Result<()> {
/// let client = AlmClient::new(connector);
/// client.session().login(&Credentials::new("bob", "secret")).await?;
///
/// let instances = client.read_test_instances("4").await?;
/// for instance in &instances {
///     println!("{:?}", instance.id());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AlmClient<C> {
    connector: C,
}

impl<C: Connector> AlmClient<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// A session establisher over the same connector.
    pub fn session(&self) -> SessionEstablisher<C>
    where
        C: Clone,
    {
        SessionEstablisher::new(self.connector.clone())
    }

    pub async fn read_test(&self, id: &str) -> Result<Test> {
        self.read_entity(id).await
    }

    pub async fn read_test_set(&self, id: &str) -> Result<TestSet> {
        self.read_entity(id).await
    }

    pub async fn read_test_instance(&self, id: &str) -> Result<TestInstance> {
        self.read_entity(id).await
    }

    /// Read every test instance of a test set.
    #[instrument(skip(self))]
    pub async fn read_test_instances(&self, test_set_id: &str) -> Result<TestInstances> {
        let url = self
            .connector
            .entity_collection_url(EntityKind::TestInstance);
        let request = RestRequest::get(url).query("query", format!("{{cycle-id[{}]}}", test_set_id));

        self.connector.execute(request).await?.json()
    }

    pub async fn read_run(&self, id: &str) -> Result<Run> {
        self.read_entity(id).await
    }

    #[instrument(skip(self, run))]
    pub async fn create_run(&self, run: &Run) -> Result<Run> {
        let url = self.connector.entity_collection_url(EntityKind::Run);
        debug!(%url, "Creating run");

        let request = RestRequest::post(url).json(run)?;
        self.connector.execute(request).await?.json()
    }

    /// Update a run. Server-managed fields are stripped from the body.
    #[instrument(skip(self, run), fields(id = ?run.id()))]
    pub async fn update_run(&self, mut run: Run) -> Result<Run> {
        let id = required(&run, "id")?;
        let url = self.connector.entity_url(EntityKind::Run, &id);

        run.clear_before_update();

        let request = RestRequest::put(url).json(&run)?;
        self.connector.execute(request).await?.json()
    }

    #[instrument(skip(self))]
    pub async fn read_run_steps(&self, run_id: &str) -> Result<RunSteps> {
        let url = self.run_steps_url(run_id);
        self.connector.execute(RestRequest::get(url)).await?.json()
    }

    #[instrument(skip(self))]
    pub async fn read_run_step(&self, run_id: &str, id: &str) -> Result<RunStep> {
        let url = self
            .connector
            .entity_path_url(EntityKind::Run, &[run_id, RUN_STEPS, id]);
        self.connector.execute(RestRequest::get(url)).await?.json()
    }

    /// Create a step under the run named by its `parent-id`.
    #[instrument(skip(self, step), fields(run_id = ?step.run_id()))]
    pub async fn create_run_step(&self, step: &RunStep) -> Result<RunStep> {
        let run_id = required(step, "parent-id")?;
        let url = self.run_steps_url(&run_id);

        let request = RestRequest::post(url).json(step)?;
        self.connector.execute(request).await?.json()
    }

    /// Update a run step. Server-managed fields are stripped from the body.
    #[instrument(skip(self, step), fields(id = ?step.id(), run_id = ?step.run_id()))]
    pub async fn update_run_step(&self, mut step: RunStep) -> Result<RunStep> {
        let run_id = required(&step, "parent-id")?;
        let id = required(&step, "id")?;
        let url = self
            .connector
            .entity_path_url(EntityKind::Run, &[run_id.as_str(), RUN_STEPS, id.as_str()]);

        step.clear_before_update();

        let request = RestRequest::put(url).json(&step)?;
        self.connector.execute(request).await?.json()
    }

    /// Upload a file as an attachment of a run or run step.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn create_attachment(
        &self,
        owner: &AttachmentOwner,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<Attachment> {
        let url = self.attachments_url(owner);
        debug!(%url, "Uploading attachment");

        let request = RestRequest::post(url)
            .header(SLUG, file_name)
            .bytes(CONTENT_TYPE_OCTET_STREAM, data);

        self.connector.execute(request).await?.json()
    }

    pub async fn create_run_attachment(
        &self,
        run_id: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<Attachment> {
        let owner = AttachmentOwner::Run(run_id.to_string());
        self.create_attachment(&owner, file_name, data).await
    }

    pub async fn create_run_step_attachment(
        &self,
        run_step_id: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<Attachment> {
        let owner = AttachmentOwner::RunStep(run_step_id.to_string());
        self.create_attachment(&owner, file_name, data).await
    }

    /// List attachment metadata of a run or run step.
    #[instrument(skip(self))]
    pub async fn read_attachments(&self, owner: &AttachmentOwner) -> Result<Collection<Attachment>> {
        let url = self.attachments_url(owner);
        self.connector.execute(RestRequest::get(url)).await?.json()
    }

    #[instrument(skip(self), fields(kind = %T::KIND))]
    async fn read_entity<T: TypedEntity>(&self, id: &str) -> Result<T> {
        let url = self.connector.entity_url(T::KIND, id);
        debug!(%url, "Reading entity");
        self.connector.execute(RestRequest::get(url)).await?.json()
    }

    fn run_steps_url(&self, run_id: &str) -> String {
        self.connector
            .entity_path_url(EntityKind::Run, &[run_id, RUN_STEPS])
    }

    fn attachments_url(&self, owner: &AttachmentOwner) -> String {
        self.connector
            .entity_path_url(owner.kind(), &[owner.id(), ATTACHMENTS])
    }
}

fn required<T: TypedEntity>(entity: &T, field: &str) -> Result<String> {
    let entity: &Entity = entity.entity();
    entity.field(field).map(str::to_string).ok_or_else(|| {
        InvalidInputError::MissingField {
            kind: entity.kind().to_string(),
            field: field.to_string(),
        }
        .into()
    })
}
