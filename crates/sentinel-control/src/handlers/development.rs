// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Development-mode handlers. Payloads are UTF-8 source or a free-text code request.

use super::{decode_text, findings};
use sentinel_core::task::{HandlerEnv, HandlerStatus, Task, TaskHandler};

/// Line count above which a unit of code is flagged as too complex.
const COMPLEXITY_LINE_LIMIT: usize = 100;

/// Counts common C-style hazards in a snippet of source code.
#[derive(Debug, Default)]
pub struct SyntaxAnalysisHandler;

impl SyntaxAnalysisHandler {
    /// Returns one finding per issue found in `code`.
    pub fn analyze(code: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if code.contains("malloc") && !code.contains("free") {
            issues.push("Potential memory leak: malloc without corresponding free".to_string());
        }
        if code.contains("strcpy") && !code.contains("strncpy") {
            issues.push("Security concern: strcpy usage (consider strncpy)".to_string());
        }
        if code.contains("fopen") && !code.contains("if") && !code.contains("NULL") {
            issues.push("Missing error handling for file operations".to_string());
        }
        let lines = code.matches('\n').count();
        if lines > COMPLEXITY_LINE_LIMIT {
            issues.push(format!(
                "Function may be too complex ({} lines), consider refactoring",
                lines
            ));
        }
        issues
    }
}

impl TaskHandler for SyntaxAnalysisHandler {
    fn name(&self) -> &'static str {
        "syntax_analysis"
    }

    fn execute(&self, task: &Task, _env: &HandlerEnv) -> HandlerStatus {
        match decode_text(task) {
            Ok(code) => findings(Self::analyze(code)),
            Err(status) => status,
        }
    }
}

/// The shape of code a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// A function or method.
    Function,
    /// A class or struct.
    Structure,
    /// Anything else.
    Other,
}

impl TemplateKind {
    /// Classifies a free-text request.
    pub fn classify(request: &str) -> Self {
        if request.contains("function") || request.contains("method") {
            TemplateKind::Function
        } else if request.contains("class") || request.contains("struct") {
            TemplateKind::Structure
        } else {
            TemplateKind::Other
        }
    }
}

/// Classifies a code-generation request.
///
/// Producing the code is left to an external generator; this handler only
/// decides which template applies.
#[derive(Debug, Default)]
pub struct CodeGenerationHandler;

impl TaskHandler for CodeGenerationHandler {
    fn name(&self) -> &'static str {
        "code_generation"
    }

    fn execute(&self, task: &Task, env: &HandlerEnv) -> HandlerStatus {
        if !env.profiles.development.code_generation {
            return HandlerStatus::Failed("code generation is disabled".to_string());
        }
        let request = match decode_text(task) {
            Ok(text) => text,
            Err(status) => return status,
        };
        let template = match TemplateKind::classify(request) {
            TemplateKind::Function => "function template",
            TemplateKind::Structure => "struct template",
            TemplateKind::Other => "generic template, request needs review",
        };
        HandlerStatus::Findings(vec![format!("Selected {}", template)])
    }
}
