use crate::macros::setter;
use crate::request::{Method, Request, RequestData};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    DabbyConsultant,
    Analyser,
    Generator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    pub name: String,
    pub description: Option<String>,
    pub agent_type: AgentType,
    pub workbench_id: String,
    #[serde(default)]
    pub config: Map<String, Value>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentQueryResponse {
    pub session_id: String,
    pub agent_id: String,
    pub message: String,
    pub response: String,
    #[serde(default)]
    pub context_chunks: Vec<Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTemplate {
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTemplates {
    pub agent_types: Vec<AgentTemplate>,
    #[serde(default)]
    pub output_formats: Vec<String>,
    #[serde(default)]
    pub report_templates: Vec<String>,
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct CreateAgent {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    agent_type: AgentType,
    workbench_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<Map<String, Value>>,
}

impl CreateAgent {
    pub fn new(
        name: impl Into<String>,
        agent_type: AgentType,
        workbench_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            agent_type,
            workbench_id: workbench_id.into(),
            config: None,
        }
    }

    setter!(opt description: String);
    setter!(opt config: Map<String, Value>);
}

impl Request for CreateAgent {
    type Data = Self;
    type Response = Agent;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/agents".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListAgents {
    #[serde(skip_serializing_if = "Option::is_none")]
    workbench_id: Option<String>,
}

impl ListAgents {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(opt workbench_id: String);
}

impl Request for ListAgents {
    type Data = Self;
    type Response = Vec<Agent>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/agents".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        if self.workbench_id.is_some() {
            RequestData::Query(self)
        } else {
            RequestData::Empty
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetAgent {
    agent_id: String,
}

impl GetAgent {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
        }
    }
}

impl Request for GetAgent {
    type Data = ();
    type Response = Agent;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/agents/{}", self.agent_id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryAgent {
    #[serde(skip)]
    agent_id: String,
    message: String,
}

impl QueryAgent {
    pub fn new(agent_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            message: message.into(),
        }
    }
}

impl Request for QueryAgent {
    type Data = Self;
    type Response = AgentQueryResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/agents/{}/query", self.agent_id).into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Default, Debug, Clone)]
pub struct GetAgentTemplates;

impl Request for GetAgentTemplates {
    type Data = ();
    type Response = AgentTemplates;

    fn endpoint(&self) -> Cow<'_, str> {
        "/agents/templates".into()
    }
}
