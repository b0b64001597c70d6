use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::consts::MAX_CELL_TYPES;
use crate::core::error::ThemeError;
use crate::core::CellType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTypeInfo {
    pub name: String,
    pub glyph: char,
}

/// One unit of work: a robot standing on `from` turns it into `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRule {
    pub from: CellType,
    pub to: CellType,
}

/// A closed set of cell types plus the rules that give them meaning.
///
/// Codes index into `cell_types`, so a theme with seven entries accepts
/// codes 0 through 6 and nothing else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub cell_types: Vec<CellTypeInfo>,
    pub impassable: Vec<CellType>,
    pub workable: Vec<CellType>,
    pub finish: CellType,
    pub progression: Vec<CellRule>,
}

pub const BUILTIN_THEMES: [&str; 3] = ["panel", "plumbing", "hydro"];

fn types(entries: &[(&str, char)]) -> Vec<CellTypeInfo> {
    entries
        .iter()
        .map(|&(name, glyph)| CellTypeInfo { name: name.to_string(), glyph })
        .collect()
}

fn rule(from: u8, to: u8) -> CellRule {
    CellRule { from: CellType(from), to: CellType(to) }
}

impl Theme {
    /// Floor/panel installer: floors become panels, panels become active.
    pub fn panel() -> Theme {
        Theme {
            name: "panel".to_string(),
            cell_types: types(&[
                ("Floor", '.'),
                ("Panel", 'p'),
                ("Active", 'a'),
                ("Sluice", 's'),
                ("Wall", '#'),
                ("Block", 'B'),
                ("Finish", 'F'),
            ]),
            impassable: vec![CellType(4), CellType(5)],
            workable: vec![CellType(0), CellType(1)],
            finish: CellType(6),
            progression: vec![rule(0, 1), rule(1, 2)],
        }
    }

    /// Plumber: empty cells get a pipe, pipes get connected.
    pub fn plumbing() -> Theme {
        Theme {
            name: "plumbing".to_string(),
            cell_types: types(&[
                ("Empty", '.'),
                ("Pipe", 'p'),
                ("Connected", 'c'),
                ("Basement", 'b'),
                ("Wall", '#'),
                ("Water", '~'),
                ("Finish", 'F'),
            ]),
            impassable: vec![CellType(4), CellType(5)],
            workable: vec![CellType(0), CellType(1)],
            finish: CellType(6),
            progression: vec![rule(0, 1), rule(1, 2)],
        }
    }

    /// Hydrology survey: shore is flooded, water is sampled.
    pub fn hydro() -> Theme {
        Theme {
            name: "hydro".to_string(),
            cell_types: types(&[
                ("Water", '~'),
                ("Shore", '.'),
                ("Sample", 's'),
                ("Network", 'n'),
                ("Barrier", '#'),
                ("Finish", 'F'),
                ("Channel", '='),
            ]),
            impassable: vec![CellType(4), CellType(6)],
            workable: vec![CellType(1), CellType(0)],
            finish: CellType(5),
            progression: vec![rule(1, 0), rule(0, 2)],
        }
    }

    pub fn builtin(name: &str) -> Option<Theme> {
        match name {
            "panel" => Some(Theme::panel()),
            "plumbing" => Some(Theme::plumbing()),
            "hydro" => Some(Theme::hydro()),
            _ => None,
        }
    }

    pub fn is_defined(&self, kind: CellType) -> bool {
        (kind.0 as usize) < self.cell_types.len()
    }

    pub fn is_impassable(&self, kind: CellType) -> bool {
        self.impassable.contains(&kind)
    }

    pub fn is_workable(&self, kind: CellType) -> bool {
        self.workable.contains(&kind)
    }

    pub fn is_finish(&self, kind: CellType) -> bool {
        self.finish == kind
    }

    pub fn rule_for(&self, kind: CellType) -> Option<CellRule> {
        self.progression.iter().copied().find(|r| r.from == kind)
    }

    pub fn type_name(&self, kind: CellType) -> &str {
        self.cell_types
            .get(kind.0 as usize)
            .map(|info| info.name.as_str())
            .unwrap_or("?")
    }

    pub fn glyph(&self, kind: CellType) -> char {
        self.cell_types
            .get(kind.0 as usize)
            .map(|info| info.glyph)
            .unwrap_or('?')
    }

    pub fn type_for_glyph(&self, glyph: char) -> Option<CellType> {
        self.cell_types
            .iter()
            .position(|info| info.glyph == glyph)
            .map(|code| CellType(code as u8))
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        let theme = || self.name.clone();

        if self.cell_types.is_empty() {
            return Err(ThemeError::NoCellTypes(theme()));
        }
        if self.cell_types.len() > MAX_CELL_TYPES {
            return Err(ThemeError::TooManyCellTypes {
                theme: theme(),
                count: self.cell_types.len(),
                max: MAX_CELL_TYPES,
            });
        }

        let mut glyphs = HashSet::new();
        for info in &self.cell_types {
            if !glyphs.insert(info.glyph) {
                return Err(ThemeError::DuplicateGlyph { theme: theme(), glyph: info.glyph });
            }
        }

        let referenced = self
            .impassable
            .iter()
            .chain(self.workable.iter())
            .chain(std::iter::once(&self.finish))
            .chain(self.progression.iter().flat_map(|r| [&r.from, &r.to]));
        for &kind in referenced {
            if !self.is_defined(kind) {
                return Err(ThemeError::UndefinedCode { theme: theme(), code: kind.0 });
            }
        }

        let mut starts = HashSet::new();
        for r in &self.progression {
            if !starts.insert(r.from) {
                return Err(ThemeError::DuplicateRule { theme: theme(), code: r.from.0 });
            }
        }

        // each type has at most one successor, so following the chain must terminate
        for r in &self.progression {
            let mut seen = HashSet::from([r.from]);
            let mut current = r.to;
            while let Some(next) = self.rule_for(current) {
                if !seen.insert(current) {
                    return Err(ThemeError::CyclicProgression { theme: theme(), code: current.0 });
                }
                current = next.to;
            }
            if seen.contains(&current) {
                return Err(ThemeError::CyclicProgression { theme: theme(), code: current.0 });
            }
        }

        // every workable type needs a rule
        if let Some(kind) = self.workable.iter().find(|&&kind| self.rule_for(kind).is_none()) {
            return Err(ThemeError::UnworkableType { theme: theme(), code: kind.0 });
        }

        if self.is_impassable(self.finish) || self.is_workable(self.finish) {
            return Err(ThemeError::InvalidFinish { theme: theme() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_are_valid() {
        for name in BUILTIN_THEMES {
            let theme = Theme::builtin(name).expect("builtin exists");
            assert_eq!(theme.name, name);
            assert_eq!(theme.validate(), Ok(()), "theme {} should validate", name);
        }
        assert!(Theme::builtin("chemistry").is_none());
    }

    #[test]
    fn panel_rules_progress_floor_to_active() {
        let theme = Theme::panel();
        assert_eq!(theme.rule_for(CellType(0)), Some(rule(0, 1)));
        assert_eq!(theme.rule_for(CellType(1)), Some(rule(1, 2)));
        assert_eq!(theme.rule_for(CellType(2)), None);
        assert_eq!(theme.type_name(CellType(5)), "Block");
        assert_eq!(theme.type_for_glyph('F'), Some(CellType(6)));
    }

    #[test]
    fn cyclic_progression_is_rejected() {
        let mut theme = Theme::panel();
        theme.progression.push(rule(2, 0));
        assert!(matches!(theme.validate(), Err(ThemeError::CyclicProgression { .. })));

        let mut theme = Theme::panel();
        theme.progression = vec![rule(3, 3)];
        assert!(matches!(theme.validate(), Err(ThemeError::CyclicProgression { code: 3, .. })));
    }

    #[test]
    fn workable_type_without_rule_is_rejected() {
        let mut theme = Theme::panel();
        theme.progression.clear();
        assert_eq!(
            theme.validate(),
            Err(ThemeError::UnworkableType { theme: "panel".to_string(), code: 0 })
        );

        let mut theme = Theme::hydro();
        theme.progression.retain(|r| r.from != CellType(0));
        assert!(matches!(theme.validate(), Err(ThemeError::UnworkableType { code: 0, .. })));
    }

    #[test]
    fn undefined_codes_are_rejected() {
        let mut theme = Theme::hydro();
        theme.impassable.push(CellType(7));
        assert_eq!(
            theme.validate(),
            Err(ThemeError::UndefinedCode { theme: "hydro".to_string(), code: 7 })
        );
    }

    #[test]
    fn duplicate_rule_and_glyph_are_rejected() {
        let mut theme = Theme::plumbing();
        theme.progression.push(rule(0, 3));
        assert!(matches!(theme.validate(), Err(ThemeError::DuplicateRule { code: 0, .. })));

        let mut theme = Theme::plumbing();
        theme.cell_types[3].glyph = '#';
        assert!(matches!(theme.validate(), Err(ThemeError::DuplicateGlyph { glyph: '#', .. })));
    }

    #[test]
    fn impassable_finish_is_rejected() {
        let mut theme = Theme::panel();
        theme.finish = CellType(4);
        assert!(matches!(theme.validate(), Err(ThemeError::InvalidFinish { .. })));
    }

    #[test]
    fn theme_round_trips_through_json() {
        let theme = Theme::hydro();
        let json = serde_json::to_string(&theme).unwrap();
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, theme);
    }
}
