//! War-assistance pseudo-quest: whenever the owning minor faction is
//! attacked, third parties earn a one-time standing bonus for killing
//! enough of the aggressor's military units.
//!
//! This runs outside the quest ledger: no catalog entry, no countdown, no
//! expiry — tracking lives exactly as long as the war does.

use crate::engine::context::TurnContext;
use crate::engine::QuestEngine;
use crate::model::{FactionId, Notification, World};

/// Standing granted to the counterpart that reaches the kill quota.
pub const WAR_ASSIST_REWARD: f64 = 100.0;
/// A quota is never smaller than this, however small the aggressor's army.
pub const MIN_KILL_QUOTA: u32 = 3;

fn quota_for(world: &World, aggressor: FactionId) -> u32 {
    let units = world.faction(aggressor).map_or(0, |f| f.military_units);
    MIN_KILL_QUOTA.max(units / 4)
}

impl QuestEngine {
    /// Hook: the owning faction was attacked by `aggressor`. Sets the kill
    /// quota (first attack only) and asks every eligible third party for
    /// assistance.
    pub fn on_attacked(&mut self, ctx: &mut TurnContext<'_>, aggressor: FactionId) {
        if self.kill_quotas.contains_key(&aggressor) {
            return;
        }
        let quota = quota_for(ctx.world, aggressor);
        self.kill_quotas.insert(aggressor, quota);
        self.kills.entry(aggressor).or_default();

        tracing::info!(
            minor = %self.faction,
            aggressor = %aggressor,
            quota,
            "war assistance opened"
        );

        for third in ctx.world.known_by(self.faction) {
            self.ask_for_assistance(ctx, third, aggressor, quota);
        }
    }

    fn ask_for_assistance(
        &self,
        ctx: &mut TurnContext<'_>,
        third: FactionId,
        aggressor: FactionId,
        quota: u32,
    ) {
        if third == aggressor {
            return;
        }
        let eligible = ctx.world.is_alive(third)
            && ctx.world.faction(third).is_some_and(|f| f.is_major())
            && !ctx.world.at_war(self.faction, third);
        if !eligible {
            return;
        }
        let capital = ctx.world.faction(self.faction).and_then(|f| f.capital);
        let text = format!(
            "{} is being attacked by {}! Kill {} of the attacker's military units and they will be immensely grateful.",
            ctx.world.faction_name(self.faction),
            ctx.world.faction_name(aggressor),
            quota
        );
        ctx.world.notify(
            third,
            Notification::diplomacy(text, self.faction)
                .at(capital)
                .with_icon(crate::model::notification::ICON_WAR),
        );
    }

    /// Hook: `killer` destroyed a military unit belonging to `victim`.
    /// Only counts while a quota for `victim` is open and the killer is a
    /// known, non-hostile third party.
    pub fn on_unit_killed(
        &mut self,
        ctx: &mut TurnContext<'_>,
        killer: FactionId,
        victim: FactionId,
    ) {
        let Some(&quota) = self.kill_quotas.get(&victim) else {
            return;
        };
        if !ctx.world.knows(self.faction, killer) || ctx.world.at_war(self.faction, killer) {
            return;
        }

        let tally = self.kills.entry(victim).or_default().entry(killer).or_insert(0);
        *tally += 1;
        if *tally < quota {
            return;
        }

        tracing::info!(
            minor = %self.faction,
            helper = %killer,
            aggressor = %victim,
            "war assistance quota reached"
        );
        let text = format!(
            "{} is deeply grateful for your assistance in the war against {}!",
            ctx.world.faction_name(self.faction),
            ctx.world.faction_name(victim)
        );
        ctx.world
            .notify(killer, Notification::diplomacy(text, self.faction));
        ctx.world
            .add_standing(self.faction, killer, WAR_ASSIST_REWARD);
        self.end_war_assistance(ctx, victim, Some(killer));
    }

    /// Hook: a counterpart met the owning faction for the first time.
    /// Re-broadcasts any open assistance requests to the newcomer.
    pub fn on_first_contact(&mut self, ctx: &mut TurnContext<'_>, other: FactionId) {
        for (aggressor, quota) in self.kill_quotas.clone() {
            self.ask_for_assistance(ctx, other, aggressor, quota);
        }
    }

    /// Turn sweep: tear down tracking for wars that are over, without any
    /// bonus.
    pub(crate) fn sweep_war_assistance(&mut self, ctx: &mut TurnContext<'_>) {
        let open: Vec<FactionId> = self.kill_quotas.keys().copied().collect();
        for aggressor in open {
            if ctx.world.is_defeated(self.faction)
                || ctx.world.is_defeated(aggressor)
                || !ctx.world.at_war(self.faction, aggressor)
            {
                self.end_war_assistance(ctx, aggressor, None);
            }
        }
    }

    /// Drop the quota and all tallies for `aggressor`, telling partial
    /// contributors their help is no longer needed. The quota-reaching
    /// winner, if any, was already rewarded and hears nothing further.
    fn end_war_assistance(
        &mut self,
        ctx: &mut TurnContext<'_>,
        aggressor: FactionId,
        winner: Option<FactionId>,
    ) {
        let quota = self.kill_quotas.remove(&aggressor).unwrap_or(0);
        let tallies = self.kills.remove(&aggressor).unwrap_or_default();

        tracing::debug!(
            minor = %self.faction,
            aggressor = %aggressor,
            rewarded = winner.is_some(),
            "war assistance closed"
        );

        for third in ctx.world.known_by(self.faction) {
            if third == aggressor || Some(third) == winner {
                continue;
            }
            if ctx.world.is_defeated(third) || ctx.world.at_war(self.faction, third) {
                continue;
            }
            if tallies.get(&third).copied().unwrap_or(0) >= quota {
                continue;
            }
            let text = format!(
                "{} no longer needs your assistance against {}.",
                ctx.world.faction_name(self.faction),
                ctx.world.faction_name(aggressor)
            );
            ctx.world
                .notify(third, Notification::diplomacy(text, self.faction));
        }
    }

    // --- Query surface ---

    pub fn war_assistance_active(&self, aggressor: FactionId) -> bool {
        self.kill_quotas.contains_key(&aggressor)
    }

    pub fn kill_quota(&self, aggressor: FactionId) -> u32 {
        self.kill_quotas.get(&aggressor).copied().unwrap_or(0)
    }

    pub fn kills_so_far(&self, aggressor: FactionId, helper: FactionId) -> u32 {
        self.kills
            .get(&aggressor)
            .and_then(|m| m.get(&helper))
            .copied()
            .unwrap_or(0)
    }
}
