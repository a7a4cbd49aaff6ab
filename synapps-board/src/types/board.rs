//! Board-level types: Board, BoardMember

use super::ids::{BoardId, MemberId, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A project board - metadata only. Columns are loaded separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owner of the board
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Board {
    /// Create a new board with the given name and owner
    pub fn new(id: impl Into<BoardId>, name: impl Into<String>, owner: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            user_id: owner.into(),
            created_at: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Membership of a user on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMember {
    pub id: MemberId,
    pub user_id: UserId,
    pub board_id: BoardId,
    pub role: String,
    pub user: MemberUser,
}

/// The user profile embedded in a membership record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
