// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

/// One chat turn in provider-agnostic form.
///
/// The role vocabulary is *not* shared across providers: the managed-runtime
/// prompt shape rewrites every turn to `Human`, while the chat-completion API
/// passes roles through verbatim. Nothing outside an adapter may assume a
/// common role enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}
