use super::MessageResponse;
use crate::macros::setter;
use crate::request::{FileUpload, Method, Request, RequestData};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbench {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_user_id: Option<String>,
    pub company_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkbenchRole {
    Owner,
    Editor,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchMember {
    pub id: String,
    pub workbench_id: String,
    pub user_id: String,
    pub role: WorkbenchRole,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchFile {
    pub id: String,
    pub workbench_id: String,
    pub storage_file_id: Option<String>,
    pub file_name: String,
    pub file_type: Option<String>,
    pub size_bytes: i64,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDownload {
    pub download_url: String,
}

/// Indexing state of all files in a workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexingStatus {
    Empty,
    Ready,
    Processing,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchStatus {
    pub status: IndexingStatus,
    pub total_files: u32,
    pub indexed_files: u32,
    pub failed_files: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct CreateWorkbench {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_id: Option<String>,
}

impl CreateWorkbench {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            company_id: None,
        }
    }

    setter!(opt description: String);
    setter!(opt company_id: String);
}

impl Request for CreateWorkbench {
    type Data = Self;
    type Response = Workbench;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/workbenches".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListWorkbenches {
    #[serde(skip_serializing_if = "Option::is_none")]
    company_id: Option<String>,
}

impl ListWorkbenches {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(opt company_id: String);
}

impl Request for ListWorkbenches {
    type Data = Self;
    type Response = Vec<Workbench>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/workbenches".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        if self.company_id.is_some() {
            RequestData::Query(self)
        } else {
            RequestData::Empty
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetWorkbench {
    workbench_id: String,
}

impl GetWorkbench {
    pub fn new(workbench_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
        }
    }
}

impl Request for GetWorkbench {
    type Data = ();
    type Response = Workbench;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}", self.workbench_id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddWorkbenchMember {
    #[serde(skip)]
    workbench_id: String,
    user_id: String,
    role: WorkbenchRole,
}

impl AddWorkbenchMember {
    pub fn new(workbench_id: impl Into<String>, user_id: impl Into<String>, role: WorkbenchRole) -> Self {
        Self {
            workbench_id: workbench_id.into(),
            user_id: user_id.into(),
            role,
        }
    }
}

impl Request for AddWorkbenchMember {
    type Data = Self;
    type Response = WorkbenchMember;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}/members", self.workbench_id).into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct ListWorkbenchMembers {
    workbench_id: String,
}

impl ListWorkbenchMembers {
    pub fn new(workbench_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
        }
    }
}

impl Request for ListWorkbenchMembers {
    type Data = ();
    type Response = Vec<WorkbenchMember>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}/members", self.workbench_id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateWorkbenchMemberRole {
    #[serde(skip)]
    workbench_id: String,
    #[serde(skip)]
    user_id: String,
    role: WorkbenchRole,
}

impl UpdateWorkbenchMemberRole {
    pub fn new(workbench_id: impl Into<String>, user_id: impl Into<String>, role: WorkbenchRole) -> Self {
        Self {
            workbench_id: workbench_id.into(),
            user_id: user_id.into(),
            role,
        }
    }
}

impl Request for UpdateWorkbenchMemberRole {
    type Data = Self;
    type Response = MessageResponse;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}/members/{}", self.workbench_id, self.user_id).into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct RemoveWorkbenchMember {
    workbench_id: String,
    user_id: String,
}

impl RemoveWorkbenchMember {
    pub fn new(workbench_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl Request for RemoveWorkbenchMember {
    type Data = ();
    type Response = Option<MessageResponse>;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}/members/{}", self.workbench_id, self.user_id).into()
    }
}

#[derive(Debug, Clone)]
pub struct UploadWorkbenchFile {
    workbench_id: String,
    file: FileUpload,
}

impl UploadWorkbenchFile {
    pub fn new(workbench_id: impl Into<String>, file: FileUpload) -> Self {
        Self {
            workbench_id: workbench_id.into(),
            file,
        }
    }
}

impl Request for UploadWorkbenchFile {
    type Data = ();
    type Response = WorkbenchFile;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}/files", self.workbench_id).into()
    }

    fn data(&self) -> RequestData<'_, ()> {
        RequestData::File(&self.file)
    }
}

#[derive(Debug, Clone)]
pub struct ListWorkbenchFiles {
    workbench_id: String,
}

impl ListWorkbenchFiles {
    pub fn new(workbench_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
        }
    }
}

impl Request for ListWorkbenchFiles {
    type Data = ();
    type Response = Vec<WorkbenchFile>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}/files", self.workbench_id).into()
    }
}

#[derive(Debug, Clone)]
pub struct DownloadWorkbenchFile {
    workbench_id: String,
    file_id: String,
}

impl DownloadWorkbenchFile {
    pub fn new(workbench_id: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
            file_id: file_id.into(),
        }
    }
}

impl Request for DownloadWorkbenchFile {
    type Data = ();
    type Response = FileDownload;

    fn endpoint(&self) -> Cow<'_, str> {
        format!(
            "/workbenches/{}/files/{}/download",
            self.workbench_id, self.file_id
        )
        .into()
    }
}

#[derive(Debug, Clone)]
pub struct GetWorkbenchStatus {
    workbench_id: String,
}

impl GetWorkbenchStatus {
    pub fn new(workbench_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
        }
    }
}

impl Request for GetWorkbenchStatus {
    type Data = ();
    type Response = WorkbenchStatus;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/workbenches/{}/status", self.workbench_id).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_omits_unset_fields() {
        let req = CreateWorkbench::new("Q3 close").company_id("co-1");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "Q3 close", "company_id": "co-1" }));
    }

    #[test]
    fn member_paths_substitute_ids() {
        let req = UpdateWorkbenchMemberRole::new("wb-1", "user-9", WorkbenchRole::Editor);
        assert_eq!(req.endpoint(), "/workbenches/wb-1/members/user-9");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "role": "editor" })
        );
    }

    #[test]
    fn list_without_company_sends_no_query() {
        assert!(matches!(ListWorkbenches::new().data(), RequestData::Empty));
        assert!(matches!(
            ListWorkbenches::new().company_id("co-1").data(),
            RequestData::Query(_)
        ));
    }

    #[test]
    fn unknown_indexing_status_is_tolerated() {
        let status: WorkbenchStatus = serde_json::from_value(serde_json::json!({
            "status": "paused",
            "total_files": 2,
            "indexed_files": 1,
            "failed_files": 0
        }))
        .unwrap();
        assert_eq!(status.status, IndexingStatus::Unknown);
        assert!(status.errors.is_empty());
    }
}
