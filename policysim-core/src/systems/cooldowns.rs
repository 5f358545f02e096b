use crate::state::GameState;
use tracing::instrument;

/// Decrements every policy cooldown by one turn and drops expired entries.
#[instrument(skip_all, name = "cooldowns")]
pub fn run_cooldown_tick(state: &mut GameState) {
    state.cooldowns.retain(|id, turns| {
        *turns = turns.saturating_sub(1);
        if *turns == 0 {
            log::trace!("Policy {} available again", id);
        }
        *turns > 0
    });
}
