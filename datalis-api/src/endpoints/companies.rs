use super::MessageResponse;
use crate::macros::setter;
use crate::request::{Method, Request, RequestData};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyRole {
    Admin,
    Member,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMember {
    pub id: String,
    pub company_id: String,
    pub user_id: String,
    pub role: CompanyRole,
    pub created_at: String,
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct CreateCompany {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
}

impl CreateCompany {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            domain: None,
        }
    }

    setter!(opt description: String);
    setter!(opt domain: String);
}

impl Request for CreateCompany {
    type Data = Self;
    type Response = Company;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/companies".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Default, Debug, Clone)]
pub struct ListCompanies;

impl Request for ListCompanies {
    type Data = ();
    type Response = Vec<Company>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/companies".into()
    }
}

#[derive(Debug, Clone)]
pub struct GetCompany {
    company_id: String,
}

impl GetCompany {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
        }
    }
}

impl Request for GetCompany {
    type Data = ();
    type Response = Company;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/companies/{}", self.company_id).into()
    }
}

/// Partial update; only the fields that were set are sent.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCompany {
    #[serde(skip)]
    company_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
}

impl UpdateCompany {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            name: None,
            description: None,
            domain: None,
        }
    }

    setter!(opt name: String);
    setter!(opt description: String);
    setter!(opt domain: String);
}

impl Request for UpdateCompany {
    type Data = Self;
    type Response = Company;
    const METHOD: Method = Method::PATCH;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/companies/{}", self.company_id).into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCompanyMember {
    #[serde(skip)]
    company_id: String,
    user_id: String,
    role: CompanyRole,
}

impl AddCompanyMember {
    pub fn new(company_id: impl Into<String>, user_id: impl Into<String>, role: CompanyRole) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: user_id.into(),
            role,
        }
    }
}

impl Request for AddCompanyMember {
    type Data = Self;
    type Response = CompanyMember;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/companies/{}/members", self.company_id).into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct ListCompanyMembers {
    company_id: String,
}

impl ListCompanyMembers {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
        }
    }
}

impl Request for ListCompanyMembers {
    type Data = ();
    type Response = Vec<CompanyMember>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/companies/{}/members", self.company_id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCompanyMemberRole {
    #[serde(skip)]
    company_id: String,
    #[serde(skip)]
    user_id: String,
    role: CompanyRole,
}

impl UpdateCompanyMemberRole {
    pub fn new(company_id: impl Into<String>, user_id: impl Into<String>, role: CompanyRole) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: user_id.into(),
            role,
        }
    }
}

impl Request for UpdateCompanyMemberRole {
    type Data = Self;
    type Response = MessageResponse;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/companies/{}/members/{}", self.company_id, self.user_id).into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct RemoveCompanyMember {
    company_id: String,
    user_id: String,
}

impl RemoveCompanyMember {
    pub fn new(company_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl Request for RemoveCompanyMember {
    type Data = ();
    type Response = Option<MessageResponse>;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/companies/{}/members/{}", self.company_id, self.user_id).into()
    }
}
