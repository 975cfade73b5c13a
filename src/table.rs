//! The transition table: validated rules keyed by (state, symbol), with exact-match lookup and
//! wildcard fallback. A table is assembled once through [`TableBuilder`] and is read-only after
//! [`TableBuilder::build`].

use crate::types::{
    Action, NextState, StateMatch, SymbolMatch, Transition, TransitionKey, TuringMachineError,
    Write, BLANK_SYMBOL, START_STATE, WILDCARD,
};
use std::collections::{HashMap, HashSet};

/// Rules sharing one state pattern, indexed into `TransitionTable::transitions`.
#[derive(Debug, Default, Clone)]
struct StateRules {
    exact: HashMap<char, usize>,
    any: Option<usize>,
}

impl StateRules {
    fn get(&self, read: SymbolMatch) -> Option<usize> {
        match read {
            SymbolMatch::Symbol(c) => self.exact.get(&c).copied(),
            SymbolMatch::Any => self.any,
        }
    }

    fn insert(&mut self, read: SymbolMatch, index: usize) {
        match read {
            SymbolMatch::Symbol(c) => {
                self.exact.insert(c, index);
            }
            SymbolMatch::Any => self.any = Some(index),
        }
    }
}

/// How a rule was selected for the current state and symbol, from most to least specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// `(state, symbol)`
    Exact,
    /// `(state, *)`
    AnySymbol,
    /// `(*, symbol)`
    AnyState,
    /// `(*, *)`
    AnyStateAnySymbol,
}

/// A rule selected by [`TransitionTable::lookup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub transition: &'a Transition,
    pub kind: MatchKind,
}

impl Match<'_> {
    /// `true` if the rule's key is exactly the current (state, symbol) pair.
    pub fn is_exact(&self) -> bool {
        self.kind == MatchKind::Exact
    }

    /// Resolves the rule's wildcards against what the machine actually holds.
    ///
    /// A `*` new symbol writes back `read`; a `*` new state keeps `state`.
    pub fn resolve(&self, state: &str, read: char) -> Action {
        Action {
            write: match self.transition.write {
                Write::Symbol(c) => c,
                Write::Keep => read,
            },
            direction: self.transition.direction,
            next_state: match &self.transition.next_state {
                NextState::State(s) => s.clone(),
                NextState::Same => state.to_string(),
            },
        }
    }
}

/// An immutable set of transition rules plus the alphabet and state set they declare.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
    by_state: HashMap<String, StateRules>,
    any_state: StateRules,
    symbols: HashSet<char>,
    /// Set when some rule reads `*`, which makes every symbol readable.
    any_symbol: bool,
    states: HashSet<String>,
}

impl TransitionTable {
    /// Finds the rule for `state` reading `symbol`.
    ///
    /// Exact keys win over `(state, *)`, which wins over the any-state keys `(*, symbol)` and
    /// `(*, *)`. `None` means the machine has no move left.
    pub fn lookup(&self, state: &str, symbol: char) -> Option<Match<'_>> {
        let own = self.by_state.get(state);

        let found = own
            .and_then(|rules| rules.exact.get(&symbol).map(|&i| (i, MatchKind::Exact)))
            .or_else(|| own.and_then(|rules| rules.any.map(|i| (i, MatchKind::AnySymbol))))
            .or_else(|| {
                self.any_state
                    .exact
                    .get(&symbol)
                    .map(|&i| (i, MatchKind::AnyState))
            })
            .or_else(|| self.any_state.any.map(|i| (i, MatchKind::AnyStateAnySymbol)));

        found.map(|(index, kind)| Match {
            transition: &self.transitions[index],
            kind,
        })
    }

    /// Returns the rule registered under exactly `key`, without any fallback.
    pub fn get(&self, key: &TransitionKey) -> Option<&Transition> {
        let rules = match &key.state {
            StateMatch::State(s) => self.by_state.get(s)?,
            StateMatch::Any => &self.any_state,
        };

        rules.get(key.read).map(|index| &self.transitions[index])
    }

    /// Looks up a rule and resolves it in one go.
    pub fn resolve(&self, state: &str, symbol: char) -> Option<(Match<'_>, Action)> {
        self.lookup(state, symbol).map(|m| {
            let action = m.resolve(state, symbol);
            (m, action)
        })
    }

    /// `true` if some rule reads or writes `symbol`, or it is the blank.
    ///
    /// A table without rules, or with a rule reading `*`, accepts every symbol.
    pub fn is_known_symbol(&self, symbol: char) -> bool {
        self.any_symbol || self.transitions.is_empty() || self.symbols.contains(&symbol)
    }

    /// `true` if some rule starts in or moves to `state`, or it is the start state.
    pub fn is_known_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    pub fn symbols(&self) -> &HashSet<char> {
        &self.symbols
    }

    pub fn states(&self) -> &HashSet<String> {
        &self.states
    }

    /// Rules in the order they appeared in the source.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Accumulates validated rules, rejecting duplicate keys.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    transitions: Vec<Transition>,
    by_state: HashMap<String, StateRules>,
    any_state: StateRules,
    symbols: HashSet<char>,
    any_symbol: bool,
    states: HashSet<String>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            by_state: HashMap::new(),
            any_state: StateRules::default(),
            symbols: HashSet::from([BLANK_SYMBOL]),
            any_symbol: false,
            states: HashSet::from([START_STATE.to_string()]),
        }
    }

    /// Adds one rule.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if no earlier rule has the same (state, symbol) key.
    /// * `Err(TuringMachineError::DuplicateTransition)` otherwise; the builder is unchanged.
    pub fn insert(&mut self, transition: Transition) -> Result<(), TuringMachineError> {
        let existing = self
            .rules_for(&transition.state)
            .and_then(|rules| rules.get(transition.read));

        if let Some(first) = existing {
            return Err(TuringMachineError::DuplicateTransition {
                line: transition.line,
                first_line: self.transitions[first].line,
                state: match &transition.state {
                    StateMatch::State(s) => s.clone(),
                    StateMatch::Any => WILDCARD.to_string(),
                },
                symbol: match transition.read {
                    SymbolMatch::Symbol(c) => c,
                    SymbolMatch::Any => WILDCARD,
                },
            });
        }

        self.register(&transition);

        let index = self.transitions.len();
        let rules = match &transition.state {
            StateMatch::State(s) => self.by_state.entry(s.clone()).or_default(),
            StateMatch::Any => &mut self.any_state,
        };
        rules.insert(transition.read, index);
        self.transitions.push(transition);

        Ok(())
    }

    /// Freezes the rules into a table.
    pub fn build(self) -> TransitionTable {
        tracing::debug!(
            rules = self.transitions.len(),
            states = self.states.len(),
            symbols = self.symbols.len(),
            "transition table built"
        );

        TransitionTable {
            transitions: self.transitions,
            by_state: self.by_state,
            any_state: self.any_state,
            symbols: self.symbols,
            any_symbol: self.any_symbol,
            states: self.states,
        }
    }

    fn rules_for(&self, state: &StateMatch) -> Option<&StateRules> {
        match state {
            StateMatch::State(s) => self.by_state.get(s),
            StateMatch::Any => Some(&self.any_state),
        }
    }

    /// Adds the rule's concrete symbols and states to the known sets. A `*` read opens the alphabet.
    fn register(&mut self, transition: &Transition) {
        match transition.read {
            SymbolMatch::Symbol(c) => {
                self.symbols.insert(c);
            }
            SymbolMatch::Any => self.any_symbol = true,
        }
        if let Write::Symbol(c) = transition.write {
            self.symbols.insert(c);
        }
        if let StateMatch::State(s) = &transition.state {
            self.states.insert(s.clone());
        }
        if let NextState::State(s) = &transition.next_state {
            self.states.insert(s.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_line};
    use crate::types::Direction;

    fn builder_with(lines: &[&str]) -> Result<TableBuilder, TuringMachineError> {
        let mut builder = TableBuilder::new();
        for (i, line) in lines.iter().enumerate() {
            if let Some(t) = parse_line(i + 1, line)? {
                builder.insert(t)?;
            }
        }
        Ok(builder)
    }

    #[test]
    fn test_exact_lookup() {
        let table = parse("0 1 0 r 1").unwrap();
        let found = table.lookup("0", '1').unwrap();

        assert!(found.is_exact());
        assert_eq!(found.transition.direction, Direction::Right);
        assert!(table.lookup("0", '0').is_none());
        assert!(table.lookup("1", '1').is_none());
    }

    #[test]
    fn test_exact_preferred_over_wildcard() {
        let table = parse("0 * * l 0\n0 1 x r 1").unwrap();

        let exact = table.lookup("0", '1').unwrap();
        assert_eq!(exact.kind, MatchKind::Exact);
        assert_eq!(exact.transition.write, Write::Symbol('x'));

        let wild = table.lookup("0", 'x').unwrap();
        assert_eq!(wild.kind, MatchKind::AnySymbol);
        assert_eq!(wild.transition.direction, Direction::Left);
    }

    #[test]
    fn test_any_state_is_last_resort() {
        let table = parse("* _ 1 r halt\n* * * * halt\nq _ 2 l q").unwrap();

        assert_eq!(table.lookup("q", '_').unwrap().kind, MatchKind::Exact);
        assert_eq!(table.lookup("p", '_').unwrap().kind, MatchKind::AnyState);
        assert_eq!(
            table.lookup("p", 'z').unwrap().kind,
            MatchKind::AnyStateAnySymbol
        );
    }

    #[test]
    fn test_resolve_pass_through() {
        let table = parse("0 * * r *").unwrap();
        let (found, action) = table.resolve("0", 'a').unwrap();

        assert!(!found.is_exact());
        assert_eq!(action.write, 'a');
        assert_eq!(action.direction, Direction::Right);
        assert_eq!(action.next_state, "0");
    }

    #[test]
    fn test_resolve_literal_fields() {
        let table = parse("0 a b l q1").unwrap();
        let (_, action) = table.resolve("0", 'a').unwrap();

        assert_eq!(
            action,
            Action {
                write: 'b',
                direction: Direction::Left,
                next_state: "q1".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_exact_key() {
        let error = builder_with(&["0 1 0 r 1", "; comment", "0 1 1 l 2"]).unwrap_err();

        assert_eq!(
            error,
            TuringMachineError::DuplicateTransition {
                line: 3,
                first_line: 1,
                state: "0".into(),
                symbol: '1',
            }
        );
    }

    #[test]
    fn test_duplicate_wildcard_key() {
        let error = builder_with(&["0 * 0 r 1", "0 * 1 l 2"]).unwrap_err();
        assert!(matches!(
            error,
            TuringMachineError::DuplicateTransition { symbol: '*', .. }
        ));

        let error = builder_with(&["* * 0 r 1", "* * 1 l 2"]).unwrap_err();
        assert!(matches!(
            error,
            TuringMachineError::DuplicateTransition { line: 2, .. }
        ));
    }

    #[test]
    fn test_same_symbol_in_different_states_is_not_duplicate() {
        let table = builder_with(&["0 1 0 r 1", "1 1 0 r 0", "0 * 0 r 1"])
            .unwrap()
            .build();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_known_symbols_and_states() {
        let table = parse("0 a b r q1\nq1 b * l *").unwrap();

        assert!(table.is_known_symbol('a'));
        assert!(table.is_known_symbol('b'));
        assert!(table.is_known_symbol(BLANK_SYMBOL));
        assert!(!table.is_known_symbol(WILDCARD));
        assert!(!table.is_known_symbol('c'));

        assert!(table.is_known_state("0"));
        assert!(table.is_known_state("q1"));
        assert!(!table.is_known_state("*"));
        assert!(!table.is_known_state("q2"));
    }

    #[test]
    fn test_wildcard_read_accepts_any_symbol() {
        let table = parse("0 * * r halt").unwrap();

        assert!(table.is_known_symbol('a'));
        assert!(table.is_known_symbol('z'));
        assert!(table.is_known_state("halt"));

        // A `*` write keeps the alphabet closed.
        let table = parse("0 a * r *").unwrap();
        assert!(!table.is_known_symbol('z'));

        let table = parse("* * x l 0").unwrap();
        assert!(table.is_known_symbol('q'));
    }

    #[test]
    fn test_empty_table_knows_start_and_blank() {
        let table = parse("; nothing here\n").unwrap();

        assert!(table.is_empty());
        assert!(table.is_known_state(START_STATE));
        assert!(table.is_known_symbol(BLANK_SYMBOL));
        assert!(table.is_known_symbol('7'));
        assert!(!table.is_known_state("q1"));
        assert!(table.lookup(START_STATE, BLANK_SYMBOL).is_none());
    }

    #[test]
    fn test_get_by_key_has_no_fallback() {
        let table = parse("0 * * r 0\n0 a b r 0").unwrap();

        for transition in table.iter() {
            assert_eq!(table.get(&transition.key()), Some(transition));
        }

        let missing = TransitionKey {
            state: StateMatch::State("0".into()),
            read: SymbolMatch::Symbol('z'),
        };
        assert!(table.get(&missing).is_none());
    }

    #[test]
    fn test_iter_preserves_source_order() {
        let table = parse("1 a a r 1\n0 b b r 1\n0 a a r 0").unwrap();
        let lines: Vec<usize> = table.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }
}
