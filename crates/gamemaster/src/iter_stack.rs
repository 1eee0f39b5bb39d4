//! Scoped iteration over a [`TokenTape`].
//!
//! Each scope is a cursor over the direct children of one container token.
//! Descending into a child pushes a scope, finishing with it pops it. When a
//! scope is popped its last visited token is kept as the stack's hint, so the
//! enclosing scope can resume after everything the nested walk consumed.

use tracing::trace;

use crate::error::IngestError;
use crate::tokens::{TokenId, TokenTape};

/// Default maximum nesting depth. The template schema needs five levels.
pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Scope {
    /// Token whose children this scope walks.
    owner: TokenId,
    /// Child most recently returned by `next`.
    cursor: Option<TokenId>,
}

#[derive(Debug)]
pub struct IterStack<'t> {
    tape: &'t TokenTape,
    scopes: Vec<Scope>,
    max_depth: usize,
    hint: Option<TokenId>,
}

impl<'t> IterStack<'t> {
    pub fn new(tape: &'t TokenTape) -> Self {
        Self::with_depth(tape, DEFAULT_MAX_DEPTH)
    }

    pub fn with_depth(tape: &'t TokenTape, max_depth: usize) -> Self {
        Self {
            tape,
            scopes: Vec::with_capacity(max_depth),
            max_depth,
            hint: None,
        }
    }

    #[inline]
    pub fn tape(&self) -> &'t TokenTape {
        self.tape
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a scope positioned before the first child of `token`.
    pub fn enter(&mut self, token: TokenId) -> Result<(), IngestError> {
        if self.scopes.len() >= self.max_depth {
            return Err(IngestError::ScopeOverflow {
                depth: self.max_depth,
            });
        }
        trace!(token, depth = self.scopes.len() + 1, "enter scope");
        self.scopes.push(Scope {
            owner: token,
            cursor: None,
        });
        self.hint = None;
        Ok(())
    }

    /// Descend into the child the current scope is positioned on. For an
    /// object member that is the key's value. Returns `None` when the scope
    /// has not been advanced yet.
    pub fn enter_current(&mut self) -> Result<Option<TokenId>, IngestError> {
        let Some(pos) = self.position() else {
            return Ok(None);
        };
        let target = match self.tape.get(pos) {
            Some(t) if !t.is_container() && t.size == 1 => t.first_child.unwrap_or(pos),
            _ => pos,
        };
        self.enter(target)?;
        Ok(Some(target))
    }

    /// Pop the current scope, remembering where it stopped.
    pub fn exit(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            trace!(token = scope.owner, depth = self.scopes.len(), "exit scope");
            self.hint = scope.cursor.or(Some(scope.owner));
        }
    }

    /// Pop scopes until `depth` remain. Used to rebalance after a nested
    /// walk bailed out early.
    pub fn unwind_to(&mut self, depth: usize) {
        while self.scopes.len() > depth {
            self.exit();
        }
    }

    /// Last token visited by the most recently exited scope.
    #[inline]
    pub fn hint(&self) -> Option<TokenId> {
        self.hint
    }

    /// Child the current scope is positioned on.
    #[inline]
    pub fn position(&self) -> Option<TokenId> {
        self.scopes.last().and_then(|s| s.cursor)
    }

    /// Owner token of the current scope.
    #[inline]
    pub fn owner(&self) -> Option<TokenId> {
        self.scopes.last().map(|s| s.owner)
    }

    /// Advance the current scope to its next child.
    ///
    /// `hint` names a token some nested walk already reached. If it lies
    /// inside a child at or after the cursor, iteration resumes after that
    /// child instead of stepping one sibling at a time. Hints outside the
    /// scope, or behind the cursor, are ignored.
    pub fn next(&mut self, hint: Option<TokenId>) -> Option<TokenId> {
        let tape = self.tape;
        let scope = self.scopes.last_mut()?;

        let resume = hint.and_then(|h| Self::child_containing(tape, scope.owner, h));
        let from = match (scope.cursor, resume) {
            (Some(cur), Some(r)) if r > cur => Some(r),
            (None, Some(r)) => Some(r),
            (cur, _) => cur,
        };

        let next = match from {
            None => tape.get(scope.owner).and_then(|t| t.first_child),
            Some(c) => {
                // A hint pointing at an unvisited direct child resumes on it.
                if Some(c) == hint && Some(c) != scope.cursor {
                    Some(c)
                } else {
                    tape.get(c).and_then(|t| t.next_sibling)
                }
            }
        };

        if let Some(n) = next {
            scope.cursor = Some(n);
        }
        next
    }

    /// Direct child of `owner` whose subtree contains `token`.
    fn child_containing(tape: &TokenTape, owner: TokenId, token: TokenId) -> Option<TokenId> {
        let mut cur = token;
        loop {
            let parent = tape.get(cur)?.parent?;
            if parent == owner {
                return Some(cur);
            }
            cur = parent;
        }
    }

    /// Scan the remaining members of the current object scope for `key`.
    ///
    /// On a hit the cursor rests on the key token and its value token is
    /// returned. On a miss the cursor is left at the last member.
    pub fn find_key(&mut self, key: &str) -> Option<TokenId> {
        while let Some(k) = self.next(None) {
            if self.tape.text(k) == key {
                return self.tape.get(k).and_then(|t| t.first_child);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "header": { "a": 1 },
        "itemTemplates": [
            { "templateId": "A", "nested": { "deep": [1, 2, 3] } },
            { "templateId": "B" },
            { "templateId": "C" }
        ]
    }"#;

    fn template_ids(tape: &TokenTape) -> Vec<String> {
        let mut stack = IterStack::new(tape);
        stack.enter(tape.root()).unwrap();
        let list = stack.find_key("itemTemplates").unwrap();
        stack.enter(list).unwrap();
        let mut ids = Vec::new();
        while let Some(item) = stack.next(stack.hint()) {
            stack.enter(item).unwrap();
            let id = stack.find_key("templateId").unwrap();
            ids.push(tape.text(id).to_string());
            stack.exit();
        }
        stack.exit();
        ids
    }

    #[test]
    fn test_walks_items_in_order() {
        let tape = TokenTape::parse(DOC).unwrap();
        assert_eq!(template_ids(&tape), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_find_key_is_forward_only() {
        let tape = TokenTape::parse(DOC).unwrap();
        let mut stack = IterStack::new(&tape);
        stack.enter(tape.root()).unwrap();
        assert!(stack.find_key("itemTemplates").is_some());
        // "header" precedes the cursor and is not revisited.
        assert!(stack.find_key("header").is_none());
    }

    #[test]
    fn test_hint_resumes_after_nested_walk() {
        let tape = TokenTape::parse(DOC).unwrap();
        let list = tape.member(tape.root(), "itemTemplates").unwrap();
        let items: Vec<_> = tape.children(list).collect();

        let mut stack = IterStack::new(&tape);
        stack.enter(list).unwrap();
        assert_eq!(stack.next(None), Some(items[0]));

        // A hint deep inside the second item skips straight past it.
        let b_id = tape.member(items[1], "templateId").unwrap();
        assert_eq!(stack.next(Some(b_id)), Some(items[2]));
        assert_eq!(stack.next(None), None);
    }

    #[test]
    fn test_hint_on_unvisited_child_resumes_on_it() {
        let tape = TokenTape::parse(DOC).unwrap();
        let list = tape.member(tape.root(), "itemTemplates").unwrap();
        let items: Vec<_> = tape.children(list).collect();

        let mut stack = IterStack::new(&tape);
        stack.enter(list).unwrap();
        assert_eq!(stack.next(Some(items[1])), Some(items[1]));
        assert_eq!(stack.next(None), Some(items[2]));
    }

    #[test]
    fn test_stale_hint_is_ignored() {
        let tape = TokenTape::parse(DOC).unwrap();
        let list = tape.member(tape.root(), "itemTemplates").unwrap();
        let items: Vec<_> = tape.children(list).collect();

        let mut stack = IterStack::new(&tape);
        stack.enter(list).unwrap();
        stack.next(None);
        stack.next(None);
        // Hint behind the cursor and a hint outside the scope both step normally.
        assert_eq!(stack.next(Some(items[0])), Some(items[2]));
        let header = tape.member(tape.root(), "header").unwrap();
        assert_eq!(stack.next(Some(header)), None);
    }

    #[test]
    fn test_depth_is_bounded() {
        let tape = TokenTape::parse(DOC).unwrap();
        let mut stack = IterStack::with_depth(&tape, 2);
        stack.enter(tape.root()).unwrap();
        stack.enter(tape.root()).unwrap();
        let err = stack.enter(tape.root()).unwrap_err();
        assert!(matches!(err, IngestError::ScopeOverflow { depth: 2 }));
    }

    #[test]
    fn test_enter_current_descends_into_value() {
        let tape = TokenTape::parse(DOC).unwrap();
        let mut stack = IterStack::new(&tape);
        stack.enter(tape.root()).unwrap();
        assert_eq!(stack.enter_current().unwrap(), None);

        stack.next(None);
        let header = stack.enter_current().unwrap().unwrap();
        assert_eq!(header, tape.member(tape.root(), "header").unwrap());
        let key = stack.next(None).unwrap();
        assert_eq!(tape.text(key), "a");
        stack.exit();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_unwind_restores_depth() {
        let tape = TokenTape::parse(DOC).unwrap();
        let mut stack = IterStack::new(&tape);
        stack.enter(tape.root()).unwrap();
        let list = stack.find_key("itemTemplates").unwrap();
        stack.enter(list).unwrap();
        let item = stack.next(None).unwrap();
        stack.enter(item).unwrap();
        assert_eq!(stack.depth(), 3);
        stack.unwind_to(1);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.owner(), Some(tape.root()));
    }
}
