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

//! Detects what the user is working in from the process list.

use sentinel_core::platform::ContextProvider;
use std::sync::{Mutex, PoisonError};
use sysinfo::{ProcessesToUpdate, System};

/// Maps a process name to a normalized activity name.
///
/// Editors map to `"vscode"`, game launchers to `"game"`, and notebook or
/// interpreter processes to `"research"`. Matching is case-insensitive.
pub fn classify_process_name(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    if name.contains("code") {
        Some("vscode")
    } else if name.contains("steam") || name.contains("game") {
        Some("game")
    } else if name.contains("python") || name.contains("jupyter") {
        Some("research")
    } else {
        None
    }
}

/// A context provider backed by the `sysinfo` process table.
///
/// Processes are scanned in pid order and the first recognized one wins.
pub struct ProcessContextProvider {
    system: Mutex<System>,
}

impl ProcessContextProvider {
    /// Creates a provider with an empty process table.
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl ContextProvider for ProcessContextProvider {
    fn foreground_application(&self) -> Option<String> {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut processes: Vec<_> = system.processes().iter().collect();
        processes.sort_by_key(|(pid, _)| **pid);
        processes
            .into_iter()
            .find_map(|(_, process)| classify_process_name(&process.name().to_string_lossy()))
            .map(str::to_string)
    }
}

impl Default for ProcessContextProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_processes() {
        assert_eq!(classify_process_name("code"), Some("vscode"));
        assert_eq!(classify_process_name("Code Helper"), Some("vscode"));
        assert_eq!(classify_process_name("steamwebhelper"), Some("game"));
        assert_eq!(classify_process_name("gamescope"), Some("game"));
        assert_eq!(classify_process_name("python3"), Some("research"));
        assert_eq!(classify_process_name("jupyter-lab"), Some("research"));
    }

    #[test]
    fn test_classify_unknown_process() {
        assert_eq!(classify_process_name("bash"), None);
        assert_eq!(classify_process_name(""), None);
    }
}
