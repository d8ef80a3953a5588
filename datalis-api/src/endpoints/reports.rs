use crate::macros::setter;
use crate::request::{Method, Request, RequestData};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

// Common

/// Report returned right after generation.
///
/// Workbench and company generation share this shape; the scope-specific id
/// is whichever of `workbench_id` / `company_id` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub report_id: String,
    #[serde(default)]
    pub workbench_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchReportSummary {
    pub report_id: String,
    pub workbench_id: String,
    pub user_id: String,
    pub report_type: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReportSummary {
    pub report_id: String,
    pub company_id: String,
    pub user_id: String,
    pub report_type: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchReport {
    pub report_id: String,
    pub workbench_id: String,
    pub user_id: String,
    pub report_type: String,
    pub content: Value,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReport {
    pub report_id: String,
    pub company_id: String,
    pub user_id: String,
    pub report_type: String,
    pub content: Value,
    pub generated_at: String,
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct GenerateWorkbenchReport {
    workbench_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_type: Option<String>,
}

impl GenerateWorkbenchReport {
    pub fn new(workbench_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
            report_type: None,
        }
    }

    setter!(opt report_type: String);
}

impl Request for GenerateWorkbenchReport {
    type Data = Self;
    type Response = GeneratedReport;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/reports/workbench".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCompanyReport {
    company_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_type: Option<String>,
}

impl GenerateCompanyReport {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            report_type: None,
        }
    }

    setter!(opt report_type: String);
}

impl Request for GenerateCompanyReport {
    type Data = Self;
    type Response = GeneratedReport;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/reports/company".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListWorkbenchReports {
    workbench_id: String,
}

impl ListWorkbenchReports {
    pub fn new(workbench_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
        }
    }
}

impl Request for ListWorkbenchReports {
    type Data = Self;
    type Response = Vec<WorkbenchReportSummary>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/reports/workbench".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Query(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListCompanyReports {
    company_id: String,
}

impl ListCompanyReports {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
        }
    }
}

impl Request for ListCompanyReports {
    type Data = Self;
    type Response = Vec<CompanyReportSummary>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/reports/company".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Query(self)
    }
}

#[derive(Debug, Clone)]
pub struct GetWorkbenchReport {
    report_id: String,
}

impl GetWorkbenchReport {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
        }
    }
}

impl Request for GetWorkbenchReport {
    type Data = ();
    type Response = WorkbenchReport;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/reports/workbench/{}", self.report_id).into()
    }
}

#[derive(Debug, Clone)]
pub struct GetCompanyReport {
    report_id: String,
}

impl GetCompanyReport {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
        }
    }
}

impl Request for GetCompanyReport {
    type Data = ();
    type Response = CompanyReport;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/reports/company/{}", self.report_id).into()
    }
}
