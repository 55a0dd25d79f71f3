//! When steps for generation pipeline BDD scenarios.

use super::world::{GenerationWorld, run_async};
use rstest_bdd_macros::when;
use testsmith::generation::{domain::OwnerId, services::CreateGenerationRequest};

#[when(r#"the owner submits "{code}" written in "{language}""#)]
fn owner_submits(
    world: &mut GenerationWorld,
    code: String,
    language: String,
) -> Result<(), eyre::Report> {
    let request = CreateGenerationRequest::new(code.clone(), language.clone());
    let result = run_async(world.service()?.create(world.owner, request));
    world.submitted = Some((code, language));
    world.last_result = Some(result);
    Ok(())
}

#[when("another owner looks up the generation")]
fn another_owner_looks_up(world: &mut GenerationWorld) -> Result<(), eyre::Report> {
    let generation = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submission result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("submission failed unexpectedly: {err}"))?
        .clone();
    let lookup = run_async(world.service()?.find_one(generation.id(), OwnerId::new()));
    world.lookup_result = Some(lookup);
    Ok(())
}
