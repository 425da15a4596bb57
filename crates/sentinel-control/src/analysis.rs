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

//! Mode prediction from observed user activity.

use sentinel_core::mode::Mode;

const GAMING_MARKERS: [&str; 2] = ["game", "steam"];
const DEVELOPMENT_MARKERS: [&str; 3] = ["code", "ide", "editor"];
const RESEARCH_MARKERS: [&str; 3] = ["jupyter", "research", "python"];

/// Decides which mode the current activity calls for.
///
/// The rules are checked in order and the first match wins:
/// 1. **Gaming**: the application name contains `game` or `steam`.
/// 2. **Development**: it contains `code`, `ide` or `editor`.
/// 3. **Research**: it contains `jupyter`, `research` or `python`.
/// 4. Otherwise the user's preferred mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModePredictor;

impl ModePredictor {
    /// Predicts the desired mode. Matching is case-sensitive substring search.
    pub fn predict(&self, application: &str, preferred: Mode) -> Mode {
        let contains_any = |markers: &[&str]| markers.iter().any(|m| application.contains(m));

        if contains_any(&GAMING_MARKERS) {
            Mode::Gaming
        } else if contains_any(&DEVELOPMENT_MARKERS) {
            Mode::Development
        } else if contains_any(&RESEARCH_MARKERS) {
            Mode::Research
        } else {
            preferred
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaming_markers() {
        let p = ModePredictor;
        assert_eq!(p.predict("steam", Mode::Development), Mode::Gaming);
        assert_eq!(p.predict("game", Mode::Research), Mode::Gaming);
        assert_eq!(p.predict("my-game-launcher", Mode::Research), Mode::Gaming);
    }

    #[test]
    fn test_development_markers() {
        let p = ModePredictor;
        assert_eq!(p.predict("vscode", Mode::Research), Mode::Development);
        assert_eq!(p.predict("jetbrains-ide", Mode::Research), Mode::Development);
        assert_eq!(p.predict("editor", Mode::Gaming), Mode::Development);
    }

    #[test]
    fn test_research_markers() {
        let p = ModePredictor;
        assert_eq!(p.predict("jupyter", Mode::Development), Mode::Research);
        assert_eq!(p.predict("research", Mode::Development), Mode::Research);
        assert_eq!(p.predict("python3", Mode::Development), Mode::Research);
    }

    #[test]
    fn test_first_rule_wins() {
        let p = ModePredictor;
        // "steam" beats "code".
        assert_eq!(p.predict("steam-code", Mode::Research), Mode::Gaming);
        // "ide" inside "python-ide" beats "python".
        assert_eq!(p.predict("python-ide", Mode::Gaming), Mode::Development);
    }

    #[test]
    fn test_falls_back_to_preferred() {
        let p = ModePredictor;
        assert_eq!(p.predict("system", Mode::Development), Mode::Development);
        assert_eq!(p.predict("", Mode::Research), Mode::Research);
        assert_eq!(p.predict("GAME", Mode::Development), Mode::Development);
    }
}
