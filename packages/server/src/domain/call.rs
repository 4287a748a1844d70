//! Call signaling state machine.
//!
//! Each participant of a call has a leg that points at its peer. A call is
//! "ringing" while the caller's leg is `Calling` and the callee's leg is
//! `Incoming`, and "connected" once both legs are `Connected`. Identities
//! without a leg are `Idle`. Legs are always created and removed in pairs.
//!
//! Transitions that do not apply to the current state are ignored rather than
//! reported as errors.

use std::collections::HashMap;

use super::{entity::Profile, value_object::ClientId};

/// Call state of one identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Calling,
    Incoming,
    Connected,
}

/// Call event sent by an actor towards a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallAction {
    Request,
    Accept,
    Reject,
    End,
    Signal,
}

/// Result of applying a `CallAction` to the `CallBook`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTransition {
    /// The event is valid and must be forwarded to the target
    Applied,
    /// A call request hit a callee that is already in a call
    Busy,
    /// The event does not apply to the current state
    Ignored,
}

/// Result of a call event as seen from outside the `Lobby`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Applied { actor: Profile, target: Profile },
    Busy { actor: Profile, target: Profile },
    Ignored,
    /// The target is not a connected identity (the event is dropped)
    TargetUnavailable,
}

/// Peer left behind when a call is torn down, with the state its leg was in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPeer {
    pub id: ClientId,
    pub state: CallState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CallLeg {
    peer: ClientId,
    state: CallState,
}

/// Transient bookkeeping of every call in progress
#[derive(Debug, Clone, Default)]
pub struct CallBook {
    legs: HashMap<ClientId, CallLeg>,
}

impl CallBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, id: &ClientId) -> CallState {
        self.legs
            .get(id)
            .map(|leg| leg.state)
            .unwrap_or(CallState::Idle)
    }

    pub fn peer_of(&self, id: &ClientId) -> Option<&ClientId> {
        self.legs.get(id).map(|leg| &leg.peer)
    }

    #[cfg(test)]
    fn active_calls(&self) -> usize {
        self.legs.len() / 2
    }

    /// Apply `action` sent by `actor` towards `target`.
    pub fn apply(
        &mut self,
        action: CallAction,
        actor: &ClientId,
        target: &ClientId,
    ) -> CallTransition {
        if actor == target {
            return CallTransition::Ignored;
        }
        match action {
            CallAction::Request => self.request(actor, target),
            CallAction::Accept => self.accept(actor, target),
            CallAction::Reject => self.reject(actor, target),
            CallAction::End => self.end(actor, target),
            CallAction::Signal => {
                if self.is_paired(actor, target) {
                    CallTransition::Applied
                } else {
                    CallTransition::Ignored
                }
            }
        }
    }

    fn request(&mut self, caller: &ClientId, callee: &ClientId) -> CallTransition {
        // A caller with a leg of its own keeps that call; the request is dropped.
        if self.legs.contains_key(caller) {
            return CallTransition::Ignored;
        }
        if self.legs.contains_key(callee) {
            return CallTransition::Busy;
        }
        self.legs.insert(
            caller.clone(),
            CallLeg {
                peer: callee.clone(),
                state: CallState::Calling,
            },
        );
        self.legs.insert(
            callee.clone(),
            CallLeg {
                peer: caller.clone(),
                state: CallState::Incoming,
            },
        );
        CallTransition::Applied
    }

    fn accept(&mut self, callee: &ClientId, caller: &ClientId) -> CallTransition {
        if !self.is_ringing(caller, callee) {
            return CallTransition::Ignored;
        }
        for id in [caller, callee] {
            if let Some(leg) = self.legs.get_mut(id) {
                leg.state = CallState::Connected;
            }
        }
        CallTransition::Applied
    }

    fn reject(&mut self, callee: &ClientId, caller: &ClientId) -> CallTransition {
        if !self.is_ringing(caller, callee) {
            return CallTransition::Ignored;
        }
        self.remove_pair(caller, callee);
        CallTransition::Applied
    }

    fn end(&mut self, actor: &ClientId, other: &ClientId) -> CallTransition {
        if !self.is_paired(actor, other) {
            return CallTransition::Ignored;
        }
        self.remove_pair(actor, other);
        CallTransition::Applied
    }

    /// Drop whatever call `id` is part of and return the peer.
    pub fn hang_up(&mut self, id: &ClientId) -> Option<CallPeer> {
        let leg = self.legs.remove(id)?;
        let state = self
            .legs
            .remove(&leg.peer)
            .map(|peer_leg| peer_leg.state)
            .unwrap_or(CallState::Idle);
        Some(CallPeer {
            id: leg.peer,
            state,
        })
    }

    fn is_ringing(&self, caller: &ClientId, callee: &ClientId) -> bool {
        self.leg_is(caller, callee, CallState::Calling)
            && self.leg_is(callee, caller, CallState::Incoming)
    }

    fn is_paired(&self, a: &ClientId, b: &ClientId) -> bool {
        self.peer_of(a) == Some(b) && self.peer_of(b) == Some(a)
    }

    fn leg_is(&self, id: &ClientId, peer: &ClientId, state: CallState) -> bool {
        self.legs
            .get(id)
            .is_some_and(|leg| &leg.peer == peer && leg.state == state)
    }

    fn remove_pair(&mut self, a: &ClientId, b: &ClientId) {
        self.legs.remove(a);
        self.legs.remove(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    fn ringing_book() -> (CallBook, ClientId, ClientId) {
        let mut book = CallBook::new();
        let (alice, bob) = (id("alice"), id("bob"));
        assert_eq!(
            book.apply(CallAction::Request, &bob, &alice),
            CallTransition::Applied
        );
        (book, bob, alice)
    }

    #[test]
    fn test_request_from_idle_starts_ringing() {
        // テスト項目: idle 同士で call-request すると calling / incoming になる
        // given (前提条件):
        let mut book = CallBook::new();
        let (alice, bob) = (id("alice"), id("bob"));

        // when (操作):
        let result = book.apply(CallAction::Request, &alice, &bob);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Applied);
        assert_eq!(book.state_of(&alice), CallState::Calling);
        assert_eq!(book.state_of(&bob), CallState::Incoming);
        assert_eq!(book.active_calls(), 1);
    }

    #[test]
    fn test_only_request_is_valid_from_idle() {
        // テスト項目: idle からは call-request 以外の遷移は無視される
        // given (前提条件):
        let mut book = CallBook::new();
        let (alice, bob) = (id("alice"), id("bob"));

        // when (操作):
        let results: Vec<CallTransition> = [
            CallAction::Accept,
            CallAction::Reject,
            CallAction::End,
            CallAction::Signal,
        ]
        .into_iter()
        .map(|action| book.apply(action, &alice, &bob))
        .collect();

        // then (期待する結果):
        assert!(results.iter().all(|r| *r == CallTransition::Ignored));
        assert_eq!(book.state_of(&alice), CallState::Idle);
        assert_eq!(book.state_of(&bob), CallState::Idle);
    }

    #[test]
    fn test_accept_connects_both_sides() {
        // テスト項目: callee が call-accepted すると両者が connected になる
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();

        // when (操作):
        let result = book.apply(CallAction::Accept, &callee, &caller);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Applied);
        assert_eq!(book.state_of(&caller), CallState::Connected);
        assert_eq!(book.state_of(&callee), CallState::Connected);
    }

    #[test]
    fn test_caller_cannot_accept_own_call() {
        // テスト項目: 発信者自身による call-accepted は無視される
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();

        // when (操作):
        let result = book.apply(CallAction::Accept, &caller, &callee);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Ignored);
        assert_eq!(book.state_of(&caller), CallState::Calling);
    }

    #[test]
    fn test_accept_and_reject_are_ignored_once_connected() {
        // テスト項目: connected になった後の call-accepted / call-rejected は無視される
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();
        book.apply(CallAction::Accept, &callee, &caller);

        // when (操作):
        let accept_again = book.apply(CallAction::Accept, &callee, &caller);
        let reject = book.apply(CallAction::Reject, &callee, &caller);

        // then (期待する結果):
        assert_eq!(accept_again, CallTransition::Ignored);
        assert_eq!(reject, CallTransition::Ignored);
        assert_eq!(book.state_of(&caller), CallState::Connected);
    }

    #[test]
    fn test_reject_returns_both_to_idle() {
        // テスト項目: call-rejected で両者が idle に戻る
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();

        // when (操作):
        let result = book.apply(CallAction::Reject, &callee, &caller);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Applied);
        assert_eq!(book.state_of(&caller), CallState::Idle);
        assert_eq!(book.state_of(&callee), CallState::Idle);
        assert_eq!(book.active_calls(), 0);
    }

    #[test]
    fn test_caller_can_abort_ringing_call() {
        // テスト項目: 発信者は応答前でも call-ended で発信を取り消せる
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();

        // when (操作):
        let result = book.apply(CallAction::End, &caller, &callee);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Applied);
        assert_eq!(book.state_of(&callee), CallState::Idle);
    }

    #[test]
    fn test_end_from_connected_returns_to_idle() {
        // テスト項目: connected から call-ended で両者が idle に戻る
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();
        book.apply(CallAction::Accept, &callee, &caller);

        // when (操作):
        let result = book.apply(CallAction::End, &callee, &caller);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Applied);
        assert_eq!(book.state_of(&caller), CallState::Idle);
        assert_eq!(book.state_of(&callee), CallState::Idle);
    }

    #[test]
    fn test_request_to_callee_in_call_is_busy() {
        // テスト項目: 通話中の相手への call-request は busy になる
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();
        let charlie = id("charlie");

        // when (操作):
        let result = book.apply(CallAction::Request, &charlie, &callee);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Busy);
        assert_eq!(book.state_of(&charlie), CallState::Idle);
        assert_eq!(book.peer_of(&callee), Some(&caller));
    }

    #[test]
    fn test_request_from_caller_in_call_is_ignored() {
        // テスト項目: 通話中の発信者からの call-request は、別の相手宛てでも同じ相手宛てでも無視され、既存の呼び出しは維持される
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();
        let charlie = id("charlie");

        // when (操作):
        let to_other = book.apply(CallAction::Request, &caller, &charlie);
        let to_same_peer = book.apply(CallAction::Request, &caller, &callee);
        let accept = book.apply(CallAction::Accept, &callee, &caller);

        // then (期待する結果):
        assert_eq!(to_other, CallTransition::Ignored);
        assert_eq!(to_same_peer, CallTransition::Ignored);
        assert_eq!(book.state_of(&charlie), CallState::Idle);
        assert_eq!(accept, CallTransition::Applied);
        assert_eq!(book.state_of(&caller), CallState::Connected);
    }

    #[test]
    fn test_signal_only_between_call_participants() {
        // テスト項目: シグナルは通話中の 2 者間でのみ転送が許可される
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();
        let charlie = id("charlie");

        // when (操作):
        let between_peers = book.apply(CallAction::Signal, &caller, &callee);
        let from_outsider = book.apply(CallAction::Signal, &charlie, &callee);

        // then (期待する結果):
        assert_eq!(between_peers, CallTransition::Applied);
        assert_eq!(from_outsider, CallTransition::Ignored);
    }

    #[test]
    fn test_self_call_is_ignored() {
        // テスト項目: 自分自身への call-request は無視される
        // given (前提条件):
        let mut book = CallBook::new();
        let alice = id("alice");

        // when (操作):
        let result = book.apply(CallAction::Request, &alice, &alice);

        // then (期待する結果):
        assert_eq!(result, CallTransition::Ignored);
        assert_eq!(book.state_of(&alice), CallState::Idle);
    }

    #[test]
    fn test_hang_up_returns_peer_and_clears_both_legs() {
        // テスト項目: hang_up で相手の ID と相手側の状態が返され、両者の状態が消える
        // given (前提条件):
        let (mut book, caller, callee) = ringing_book();

        // when (操作):
        let peer = book.hang_up(&callee);
        let again = book.hang_up(&callee);

        // then (期待する結果):
        assert_eq!(
            peer,
            Some(CallPeer {
                id: caller.clone(),
                state: CallState::Calling,
            })
        );
        assert_eq!(again, None);
        assert_eq!(book.state_of(&caller), CallState::Idle);
    }
}
