//! Resource hooks: one [`ApiHandle`] per hook, every operation funnelled
//! through [`ApiHandle::execute`].

use datalis_api::endpoints::{
    chat::{ChatMessage, ChatReply, ChatSession, ChatSessionSummary},
    companies::{Company, CompanyMember, CompanyRole},
    workbenches::{
        FileDownload, Workbench, WorkbenchFile, WorkbenchMember, WorkbenchRole, WorkbenchStatus,
    },
    MessageResponse,
};
use datalis_api::{Client, DatalisApiError, FileUpload, Request};
use std::sync::Arc;
use tokio::sync::watch;

use crate::api_state::{ApiHandle, ApiState};

/// Implements `From<$ty>` for each variant of a hook's data enum.
macro_rules! hook_data {
    ($data:ident { $($variant:ident($ty:ty)),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum $data {
            $($variant($ty)),+
        }

        $(
            impl From<$ty> for $data {
                fn from(value: $ty) -> Self {
                    $data::$variant(value)
                }
            }
        )+
    };
}

hook_data!(WorkbenchData {
    Workbench(Workbench),
    Workbenches(Vec<Workbench>),
    Member(WorkbenchMember),
    Members(Vec<WorkbenchMember>),
    Acknowledged(MessageResponse),
    Removed(Option<MessageResponse>),
    File(WorkbenchFile),
    Files(Vec<WorkbenchFile>),
    Download(FileDownload),
    Status(WorkbenchStatus),
});

hook_data!(CompanyData {
    Company(Company),
    Companies(Vec<Company>),
    Member(CompanyMember),
    Members(Vec<CompanyMember>),
    Acknowledged(MessageResponse),
    Removed(Option<MessageResponse>),
});

hook_data!(ChatData {
    Session(ChatSession),
    Reply(ChatReply),
    Messages(Vec<ChatMessage>),
    Sessions(Vec<ChatSessionSummary>),
});

/// Fields accepted by [`CompaniesHook::update_company`].
#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
}

pub struct WorkbenchesHook {
    client: Arc<Client>,
    api: ApiHandle<WorkbenchData>,
}

impl WorkbenchesHook {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            api: ApiHandle::new(),
        }
    }

    pub fn state(&self) -> ApiState<WorkbenchData> {
        self.api.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiState<WorkbenchData>> {
        self.api.subscribe()
    }

    pub async fn create_workbench(
        &self,
        name: &str,
        description: Option<&str>,
        company_id: Option<&str>,
    ) -> Result<Workbench, DatalisApiError> {
        let mut req = Request::workbenches().create(name);
        if let Some(description) = description {
            req = req.description(description);
        }
        if let Some(company_id) = company_id {
            req = req.company_id(company_id);
        }
        self.api.execute(self.client.send(req)).await
    }

    pub async fn get_workbenches(
        &self,
        company_id: Option<&str>,
    ) -> Result<Vec<Workbench>, DatalisApiError> {
        let repo = match company_id {
            Some(company_id) => Request::workbenches().with_company(company_id),
            None => Request::workbenches(),
        };
        self.api.execute(self.client.send(repo.list())).await
    }

    pub async fn get_workbench(&self, workbench_id: &str) -> Result<Workbench, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::workbenches().get(workbench_id)))
            .await
    }

    pub async fn add_member(
        &self,
        workbench_id: &str,
        user_id: &str,
        role: WorkbenchRole,
    ) -> Result<WorkbenchMember, DatalisApiError> {
        let req = Request::workbenches().add_member(workbench_id, user_id, role);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn get_members(
        &self,
        workbench_id: &str,
    ) -> Result<Vec<WorkbenchMember>, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::workbenches().members(workbench_id)))
            .await
    }

    pub async fn update_member_role(
        &self,
        workbench_id: &str,
        user_id: &str,
        role: WorkbenchRole,
    ) -> Result<MessageResponse, DatalisApiError> {
        let req = Request::workbenches().update_member_role(workbench_id, user_id, role);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn remove_member(
        &self,
        workbench_id: &str,
        user_id: &str,
    ) -> Result<Option<MessageResponse>, DatalisApiError> {
        let req = Request::workbenches().remove_member(workbench_id, user_id);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn upload_file(
        &self,
        workbench_id: &str,
        file: FileUpload,
    ) -> Result<WorkbenchFile, DatalisApiError> {
        let req = Request::workbenches().upload_file(workbench_id, file);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn get_files(&self, workbench_id: &str) -> Result<Vec<WorkbenchFile>, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::workbenches().files(workbench_id)))
            .await
    }

    pub async fn download_file(
        &self,
        workbench_id: &str,
        file_id: &str,
    ) -> Result<FileDownload, DatalisApiError> {
        let req = Request::workbenches().download_file(workbench_id, file_id);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn get_status(&self, workbench_id: &str) -> Result<WorkbenchStatus, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::workbenches().status(workbench_id)))
            .await
    }
}

pub struct CompaniesHook {
    client: Arc<Client>,
    api: ApiHandle<CompanyData>,
}

impl CompaniesHook {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            api: ApiHandle::new(),
        }
    }

    pub fn state(&self) -> ApiState<CompanyData> {
        self.api.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiState<CompanyData>> {
        self.api.subscribe()
    }

    pub async fn create_company(
        &self,
        name: &str,
        description: Option<&str>,
        domain: Option<&str>,
    ) -> Result<Company, DatalisApiError> {
        let mut req = Request::companies().create(name);
        if let Some(description) = description {
            req = req.description(description);
        }
        if let Some(domain) = domain {
            req = req.domain(domain);
        }
        self.api.execute(self.client.send(req)).await
    }

    pub async fn get_companies(&self) -> Result<Vec<Company>, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::companies().list()))
            .await
    }

    pub async fn get_company(&self, company_id: &str) -> Result<Company, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::companies().get(company_id)))
            .await
    }

    pub async fn update_company(
        &self,
        company_id: &str,
        changes: CompanyChanges,
    ) -> Result<Company, DatalisApiError> {
        let mut req = Request::companies().update(company_id);
        if let Some(name) = changes.name {
            req = req.name(name);
        }
        if let Some(description) = changes.description {
            req = req.description(description);
        }
        if let Some(domain) = changes.domain {
            req = req.domain(domain);
        }
        self.api.execute(self.client.send(req)).await
    }

    pub async fn add_member(
        &self,
        company_id: &str,
        user_id: &str,
        role: CompanyRole,
    ) -> Result<CompanyMember, DatalisApiError> {
        let req = Request::companies().add_member(company_id, user_id, role);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn get_members(&self, company_id: &str) -> Result<Vec<CompanyMember>, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::companies().members(company_id)))
            .await
    }

    pub async fn update_member_role(
        &self,
        company_id: &str,
        user_id: &str,
        role: CompanyRole,
    ) -> Result<MessageResponse, DatalisApiError> {
        let req = Request::companies().update_member_role(company_id, user_id, role);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn remove_member(
        &self,
        company_id: &str,
        user_id: &str,
    ) -> Result<Option<MessageResponse>, DatalisApiError> {
        let req = Request::companies().remove_member(company_id, user_id);
        self.api.execute(self.client.send(req)).await
    }
}

pub struct ChatHook {
    client: Arc<Client>,
    api: ApiHandle<ChatData>,
}

impl ChatHook {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            api: ApiHandle::new(),
        }
    }

    pub fn state(&self) -> ApiState<ChatData> {
        self.api.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiState<ChatData>> {
        self.api.subscribe()
    }

    pub async fn create_session(
        &self,
        workbench_id: &str,
        title: Option<&str>,
    ) -> Result<ChatSession, DatalisApiError> {
        let mut req = Request::chat().create_session(workbench_id);
        if let Some(title) = title {
            req = req.title(title);
        }
        self.api.execute(self.client.send(req)).await
    }

    pub async fn send_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<ChatReply, DatalisApiError> {
        let req = Request::chat().send_message(session_id, content);
        self.api.execute(self.client.send(req)).await
    }

    pub async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::chat().messages(session_id)))
            .await
    }

    pub async fn get_sessions(&self) -> Result<Vec<ChatSessionSummary>, DatalisApiError> {
        self.api
            .execute(self.client.send(Request::chat().sessions()))
            .await
    }
}
