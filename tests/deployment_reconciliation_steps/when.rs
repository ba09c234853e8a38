//! When steps for deployment reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, run_async};
use rstest_bdd_macros::when;

fn reconcile(world: &mut ReconciliationWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.reconciler.reconcile(world.agent_id))
        .map_err(|err| eyre::eyre!("reconciliation failed: {err}"))?;
    world.reports.push(report);
    Ok(())
}

#[when("the deployments are reconciled")]
fn deployments_reconciled(world: &mut ReconciliationWorld) -> Result<(), eyre::Report> {
    reconcile(world)
}

#[when("the deployments are reconciled again")]
fn deployments_reconciled_again(world: &mut ReconciliationWorld) -> Result<(), eyre::Report> {
    reconcile(world)
}
