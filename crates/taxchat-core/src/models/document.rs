use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded tax document record.
///
/// Created by the (simulated) upload flow, mutated only by the processing
/// simulation, and removed only by an explicit user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDocument {
    pub id: Uuid,
    pub name: String,
    pub year: i16,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub status: DocumentStatus,
    pub uploaded_at: jiff::Timestamp,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preview_url: Option<String>,
}

/// Kind of tax document, serialized as the form name the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "W-2")]
    W2,
    #[serde(rename = "1099")]
    Ten99,
    #[serde(rename = "1040")]
    Form1040,
    #[serde(rename = "Schedule A")]
    ScheduleA,
    #[serde(rename = "Schedule B")]
    ScheduleB,
    #[serde(rename = "Schedule C")]
    ScheduleC,
    Other,
}

impl DocumentKind {
    /// Guess a document kind from a file name, e.g. `W-2 Form 2023.pdf`.
    /// Unrecognized names fall back to [`DocumentKind::Other`].
    pub fn infer(file_name: &str) -> Self {
        let name = file_name.to_ascii_lowercase();
        if name.contains("w-2") || name.contains("w2") {
            Self::W2
        } else if name.contains("1099") {
            Self::Ten99
        } else if name.contains("1040") {
            Self::Form1040
        } else if name.contains("schedule a") {
            Self::ScheduleA
        } else if name.contains("schedule b") {
            Self::ScheduleB
        } else if name.contains("schedule c") {
            Self::ScheduleC
        } else {
            Self::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::W2 => "W-2",
            Self::Ten99 => "1099",
            Self::Form1040 => "1040",
            Self::ScheduleA => "Schedule A",
            Self::ScheduleB => "Schedule B",
            Self::ScheduleC => "Schedule C",
            Self::Other => "Other",
        }
    }
}

/// Processing status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploaded,
    Processing,
    Ready,
}

impl DocumentStatus {
    /// Status only ever moves forward: `uploaded`/`processing` → `ready`,
    /// never back.
    pub fn is_forward_transition_to(self, next: Self) -> bool {
        self.rank() < next.rank()
    }

    fn rank(self) -> u8 {
        match self {
            Self::Uploaded => 0,
            Self::Processing => 1,
            Self::Ready => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Ready => "ready",
        }
    }
}

/// A document draft, before the store stamps an id and upload timestamp.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub name: String,
    pub year: i16,
    pub kind: DocumentKind,
    pub status: DocumentStatus,
    pub file_size: Option<u64>,
    pub preview_url: Option<String>,
}
