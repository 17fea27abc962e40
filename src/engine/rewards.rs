//! Reward dispatch: standing grants, result notifications and ledger
//! removal for resolved quests.

use crate::engine::context::TurnContext;
use crate::engine::QuestEngine;
use crate::model::{FactionId, Notification, TilePos};
use crate::quest::AssignedQuest;

impl QuestEngine {
    fn capital(&self, ctx: &TurnContext<'_>) -> Option<TilePos> {
        ctx.world.faction(self.faction).and_then(|f| f.capital)
    }

    /// Grant the quest's reward to the assignee. The grant is monotonic:
    /// a non-positive configured reward changes nothing but still counts as
    /// a win for notification purposes.
    pub(crate) fn give_reward(&mut self, ctx: &mut TurnContext<'_>, quest: &AssignedQuest) {
        let reward = quest.reward(ctx.catalog).max(0.0);
        let capital = self.capital(ctx);

        tracing::info!(
            assigner = %self.faction,
            assignee = %quest.assignee,
            kind = ?quest.kind(),
            reward,
            "quest won"
        );

        ctx.world.add_standing(self.faction, quest.assignee, reward);
        if reward > 0.0 {
            let text = format!(
                "{} rewarded you with {} standing for completing the {} quest.",
                ctx.world.faction_name(self.faction),
                reward as i64,
                quest.kind().display_name()
            );
            ctx.world.notify(
                quest.assignee,
                Notification::diplomacy(text, self.faction).at(capital),
            );
        }
    }

    /// "We no longer need your help" — dropped, obsolete, or a contest that
    /// nobody won.
    pub(crate) fn notify_no_longer_needed(
        &self,
        ctx: &mut TurnContext<'_>,
        quest: &AssignedQuest,
    ) {
        let capital = self.capital(ctx);
        let text = format!(
            "{} no longer needs your help with the {} quest.",
            ctx.world.faction_name(self.faction),
            quest.kind().display_name()
        );
        ctx.world.notify(
            quest.assignee,
            Notification::diplomacy(text, self.faction).at(capital),
        );
    }

    /// Plain timeout: the deadline passed without success.
    pub(crate) fn notify_timed_out(&self, ctx: &mut TurnContext<'_>, quest: &AssignedQuest) {
        let capital = self.capital(ctx);
        let text = format!(
            "The {} quest for {} has expired.",
            quest.kind().display_name(),
            ctx.world.faction_name(self.faction)
        );
        ctx.world.notify(
            quest.assignee,
            Notification::diplomacy(text, self.faction).at(capital),
        );
    }

    /// Contest ended and someone else (or several someones) won.
    pub(crate) fn notify_contest_ended(
        &self,
        ctx: &mut TurnContext<'_>,
        quest: &AssignedQuest,
        winners: &[FactionId],
    ) {
        let capital = self.capital(ctx);
        let names: Vec<String> = winners
            .iter()
            .map(|id| ctx.world.faction_name(*id))
            .collect();
        let text = format!(
            "The {} quest for {} has ended. It was won by {}.",
            quest.kind().display_name(),
            ctx.world.faction_name(self.faction),
            names.join(", ")
        );
        ctx.world.notify(
            quest.assignee,
            Notification::diplomacy(text, self.faction).at(capital),
        );
    }

    /// Remove resolved instances from the ledger. Idempotent: instances no
    /// longer present are skipped without complaint.
    pub(crate) fn remove_quests(&mut self, resolved: &[AssignedQuest]) {
        if resolved.is_empty() {
            return;
        }
        self.ledger.retain(|q| !resolved.contains(q));
    }
}
