//! UseCase: 通話シグナリングの調停
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CallSignalingUseCase::execute() メソッド
//! - 通話状態の遷移と、相手への通知・シグナルの中継
//!
//! ### どのような状況を想定しているか
//! - 正常系：request → accept → signal → end の一連の流れ
//! - 正常系：request → reject
//! - 異常系：通話中の相手への request（busy 応答）
//! - エッジケース：切断済みの相手、無効な遷移、通話なしでのシグナル

use std::sync::Arc;

use crate::domain::{
    CallAction, CallOutcome, ClientId, LobbyRepository, MessagePusher, RejectReason,
    ServerEvent, SignalPayload,
};

/// Call event received from a client
#[derive(Debug, Clone, PartialEq)]
pub enum CallCommand {
    Request,
    Accept,
    Reject,
    End,
    Signal(SignalPayload),
}

impl CallCommand {
    fn action(&self) -> CallAction {
        match self {
            Self::Request => CallAction::Request,
            Self::Accept => CallAction::Accept,
            Self::Reject => CallAction::Reject,
            Self::End => CallAction::End,
            Self::Signal(_) => CallAction::Signal,
        }
    }
}

/// 通話シグナリングのユースケース
pub struct CallSignalingUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CallSignalingUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 通話イベントを処理
    ///
    /// # Arguments
    ///
    /// * `actor` - イベントを送ってきたクライアント
    /// * `target` - イベントの宛先クライアント
    /// * `command` - 通話イベント
    ///
    /// # Returns
    ///
    /// 通話状態への適用結果。無効な遷移や切断済みの宛先は何もせずに返す
    pub async fn execute(
        &self,
        actor: &ClientId,
        target: &ClientId,
        command: CallCommand,
    ) -> CallOutcome {
        let outcome = self
            .repository
            .apply_call(command.action(), actor, target)
            .await;

        match &outcome {
            CallOutcome::Applied {
                actor: from,
                target: to,
            } => {
                let event = match command {
                    CallCommand::Request => ServerEvent::CallRequest {
                        caller: from.clone(),
                        target: to.id.clone(),
                    },
                    CallCommand::Accept => ServerEvent::CallAccepted {
                        from: from.clone(),
                        target: to.id.clone(),
                    },
                    CallCommand::Reject => ServerEvent::CallRejected {
                        from: from.clone(),
                        target: to.id.clone(),
                        reason: None,
                    },
                    CallCommand::End => ServerEvent::CallEnded {
                        from: from.clone(),
                        target: to.id.clone(),
                    },
                    CallCommand::Signal(payload) => ServerEvent::Signal {
                        from: from.id.clone(),
                        target: to.id.clone(),
                        payload,
                    },
                };
                self.push(&to.id, &event).await;
            }
            CallOutcome::Busy {
                actor: caller,
                target: busy,
            } => {
                tracing::info!(
                    "Call request from '{}' to '{}' rejected: busy",
                    caller.id,
                    busy.id
                );
                let event = ServerEvent::CallRejected {
                    from: busy.clone(),
                    target: caller.id.clone(),
                    reason: Some(RejectReason::Busy),
                };
                self.push(&caller.id, &event).await;
            }
            CallOutcome::Ignored => {
                tracing::debug!(
                    "Ignored call event {:?} from '{}' to '{}'",
                    command.action(),
                    actor,
                    target
                );
            }
            CallOutcome::TargetUnavailable => {
                tracing::warn!(
                    "Dropped call event {:?} from '{}': target '{}' is not connected",
                    command.action(),
                    actor,
                    target
                );
            }
        }

        outcome
    }

    async fn push(&self, client_id: &ClientId, event: &ServerEvent) {
        if let Err(e) = self.message_pusher.push_to(client_id, event).await {
            tracing::warn!("Failed to push call event to '{}': {}", client_id, e);
        }
    }
}
