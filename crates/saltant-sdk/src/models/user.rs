// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Users.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::client::SaltantClient;
use crate::error::Result;
use crate::resource::{Resource, ResourceManager};

/// A saltant user, looked up by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

impl Resource for User {
    type Key = String;

    const KIND: &'static str = "user";
    const LIST_PATH: &'static str = "users/";
    const DETAIL_PATH: &'static str = "users/{id}/";

    fn key(&self) -> String {
        self.username.clone()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

impl User {
    pub fn sync(&self, client: &SaltantClient) -> Result<User> {
        client.users().refetch(self)
    }
}

pub type UserManager<'c> = ResourceManager<'c, User>;

impl ResourceManager<'_, User> {
    pub fn get(&self, username: &str) -> Result<User> {
        self.fetch(username)
    }
}
