use crate::endpoints::{
    agents::{AgentType, CreateAgent, GetAgent, GetAgentTemplates, ListAgents, QueryAgent},
    chat::{CreateChatSession, ListChatSessions, ListMessages, SendMessage},
    companies::{
        AddCompanyMember, CompanyRole, CreateCompany, GetCompany, ListCompanies,
        ListCompanyMembers, RemoveCompanyMember, UpdateCompany, UpdateCompanyMemberRole,
    },
    reports::{
        GenerateCompanyReport, GenerateWorkbenchReport, GetCompanyReport, GetWorkbenchReport,
        ListCompanyReports, ListWorkbenchReports,
    },
    workbenches::{
        AddWorkbenchMember, CreateWorkbench, DownloadWorkbenchFile, GetWorkbench,
        GetWorkbenchStatus, ListWorkbenchFiles, ListWorkbenchMembers, ListWorkbenches,
        RemoveWorkbenchMember, UpdateWorkbenchMemberRole, UploadWorkbenchFile, WorkbenchRole,
    },
};
use crate::request::FileUpload;

#[derive(Default)]
pub struct WorkbenchRepository {
    company_id: Option<String>,
}

impl WorkbenchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn create(&self, name: impl Into<String>) -> CreateWorkbench {
        let req = CreateWorkbench::new(name);
        match &self.company_id {
            Some(company_id) => req.company_id(company_id.clone()),
            None => req,
        }
    }

    pub fn list(&self) -> ListWorkbenches {
        let req = ListWorkbenches::new();
        match &self.company_id {
            Some(company_id) => req.company_id(company_id.clone()),
            None => req,
        }
    }

    pub fn get(&self, workbench_id: impl Into<String>) -> GetWorkbench {
        GetWorkbench::new(workbench_id)
    }

    pub fn add_member(
        &self,
        workbench_id: impl Into<String>,
        user_id: impl Into<String>,
        role: WorkbenchRole,
    ) -> AddWorkbenchMember {
        AddWorkbenchMember::new(workbench_id, user_id, role)
    }

    pub fn members(&self, workbench_id: impl Into<String>) -> ListWorkbenchMembers {
        ListWorkbenchMembers::new(workbench_id)
    }

    pub fn update_member_role(
        &self,
        workbench_id: impl Into<String>,
        user_id: impl Into<String>,
        role: WorkbenchRole,
    ) -> UpdateWorkbenchMemberRole {
        UpdateWorkbenchMemberRole::new(workbench_id, user_id, role)
    }

    pub fn remove_member(
        &self,
        workbench_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> RemoveWorkbenchMember {
        RemoveWorkbenchMember::new(workbench_id, user_id)
    }

    pub fn upload_file(&self, workbench_id: impl Into<String>, file: FileUpload) -> UploadWorkbenchFile {
        UploadWorkbenchFile::new(workbench_id, file)
    }

    pub fn files(&self, workbench_id: impl Into<String>) -> ListWorkbenchFiles {
        ListWorkbenchFiles::new(workbench_id)
    }

    pub fn download_file(
        &self,
        workbench_id: impl Into<String>,
        file_id: impl Into<String>,
    ) -> DownloadWorkbenchFile {
        DownloadWorkbenchFile::new(workbench_id, file_id)
    }

    pub fn status(&self, workbench_id: impl Into<String>) -> GetWorkbenchStatus {
        GetWorkbenchStatus::new(workbench_id)
    }
}

pub struct CompanyRepository;

impl CompanyRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn create(&self, name: impl Into<String>) -> CreateCompany {
        CreateCompany::new(name)
    }

    pub fn list(&self) -> ListCompanies {
        ListCompanies
    }

    pub fn get(&self, company_id: impl Into<String>) -> GetCompany {
        GetCompany::new(company_id)
    }

    pub fn update(&self, company_id: impl Into<String>) -> UpdateCompany {
        UpdateCompany::new(company_id)
    }

    pub fn add_member(
        &self,
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        role: CompanyRole,
    ) -> AddCompanyMember {
        AddCompanyMember::new(company_id, user_id, role)
    }

    pub fn members(&self, company_id: impl Into<String>) -> ListCompanyMembers {
        ListCompanyMembers::new(company_id)
    }

    pub fn update_member_role(
        &self,
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        role: CompanyRole,
    ) -> UpdateCompanyMemberRole {
        UpdateCompanyMemberRole::new(company_id, user_id, role)
    }

    pub fn remove_member(
        &self,
        company_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> RemoveCompanyMember {
        RemoveCompanyMember::new(company_id, user_id)
    }
}

pub struct ChatRepository;

impl ChatRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn create_session(&self, workbench_id: impl Into<String>) -> CreateChatSession {
        CreateChatSession::new(workbench_id)
    }

    pub fn send_message(
        &self,
        session_id: impl Into<String>,
        content: impl Into<String>,
    ) -> SendMessage {
        SendMessage::new(session_id, content)
    }

    pub fn messages(&self, session_id: impl Into<String>) -> ListMessages {
        ListMessages::new(session_id)
    }

    pub fn sessions(&self) -> ListChatSessions {
        ListChatSessions
    }
}

pub struct ReportRepository;

impl ReportRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn generate_for_workbench(&self, workbench_id: impl Into<String>) -> GenerateWorkbenchReport {
        GenerateWorkbenchReport::new(workbench_id)
    }

    pub fn generate_for_company(&self, company_id: impl Into<String>) -> GenerateCompanyReport {
        GenerateCompanyReport::new(company_id)
    }

    pub fn list_for_workbench(&self, workbench_id: impl Into<String>) -> ListWorkbenchReports {
        ListWorkbenchReports::new(workbench_id)
    }

    pub fn list_for_company(&self, company_id: impl Into<String>) -> ListCompanyReports {
        ListCompanyReports::new(company_id)
    }

    pub fn workbench_report(&self, report_id: impl Into<String>) -> GetWorkbenchReport {
        GetWorkbenchReport::new(report_id)
    }

    pub fn company_report(&self, report_id: impl Into<String>) -> GetCompanyReport {
        GetCompanyReport::new(report_id)
    }
}

#[derive(Default)]
pub struct AgentRepository {
    workbench_id: Option<String>,
}

impl AgentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbench(mut self, workbench_id: impl Into<String>) -> Self {
        self.workbench_id = Some(workbench_id.into());
        self
    }

    pub fn create(
        &self,
        name: impl Into<String>,
        agent_type: AgentType,
        workbench_id: impl Into<String>,
    ) -> CreateAgent {
        CreateAgent::new(name, agent_type, workbench_id)
    }

    pub fn list(&self) -> ListAgents {
        let req = ListAgents::new();
        match &self.workbench_id {
            Some(workbench_id) => req.workbench_id(workbench_id.clone()),
            None => req,
        }
    }

    pub fn get(&self, agent_id: impl Into<String>) -> GetAgent {
        GetAgent::new(agent_id)
    }

    pub fn query(&self, agent_id: impl Into<String>, message: impl Into<String>) -> QueryAgent {
        QueryAgent::new(agent_id, message)
    }

    pub fn templates(&self) -> GetAgentTemplates {
        GetAgentTemplates
    }
}
