//! Then steps for generation pipeline BDD scenarios.

use super::world::GenerationWorld;
use rstest_bdd_macros::then;
use testsmith::generation::{domain::GenerationStatus, services::GenerationServiceError};

#[then(r#"the generation is "{status}""#)]
fn generation_is(world: &GenerationWorld, status: String) -> Result<(), eyre::Report> {
    let expected = GenerationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let stored = world.stored_generation()?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the stored language is "{language}""#)]
fn stored_language_is(world: &GenerationWorld, language: String) -> Result<(), eyre::Report> {
    let stored = world.stored_generation()?;
    eyre::ensure!(
        stored.language().as_str() == language,
        "expected language {language}, found {}",
        stored.language()
    );
    Ok(())
}

#[then("the stored tests contain no code fence")]
fn stored_tests_unfenced(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let stored = world.stored_generation()?;
    let tests = stored
        .generated_tests()
        .ok_or_else(|| eyre::eyre!("completed generation has no tests"))?;
    eyre::ensure!(!tests.contains("```"), "tests still fenced: {tests}");
    eyre::ensure!(
        tests.starts_with("describe('add'"),
        "unexpected tests: {tests}"
    );
    Ok(())
}

#[then("the provider received the submission unchanged")]
fn provider_received_submission(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let (code, language) = world
        .submitted
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submission in scenario world"))?;
    let calls = world.provider()?.calls();
    let call = calls
        .first()
        .ok_or_else(|| eyre::eyre!("provider was never called"))?;
    eyre::ensure!(calls.len() == 1, "expected one call, found {}", calls.len());
    eyre::ensure!(&call.code == code, "provider received different code");
    eyre::ensure!(
        &call.language == language,
        "provider received language {}",
        call.language
    );
    Ok(())
}

#[then("the request is rejected as invalid")]
fn request_rejected(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submission result"))?;
    eyre::ensure!(
        matches!(result, Err(GenerationServiceError::Validation(_))),
        "expected validation error, got {result:?}"
    );
    Ok(())
}

#[then("no generation is stored")]
fn no_generation_stored(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let empty = world
        .repository
        .is_empty()
        .map_err(|err| eyre::eyre!("count generations: {err}"))?;
    eyre::ensure!(empty, "expected an empty repository");
    Ok(())
}

#[then("the provider was not called")]
fn provider_not_called(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let calls = world.provider()?.calls();
    eyre::ensure!(calls.is_empty(), "provider was called {} times", calls.len());
    Ok(())
}

#[then("the request fails as unavailable")]
fn request_unavailable(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submission result"))?;
    let Err(err) = result else {
        return Err(eyre::eyre!("expected failure, got {result:?}"));
    };
    eyre::ensure!(
        err.status_code() == 503,
        "expected status 503, got {} ({err})",
        err.status_code()
    );
    Ok(())
}

#[then("the stored generation has no tests")]
fn stored_generation_has_no_tests(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let stored = world.stored_generation()?;
    eyre::ensure!(
        stored.generated_tests().is_none(),
        "failed generation carries tests"
    );
    Ok(())
}

#[then("the lookup reports the generation as not found")]
fn lookup_not_found(world: &GenerationWorld) -> Result<(), eyre::Report> {
    let lookup = world
        .lookup_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing lookup result"))?;
    eyre::ensure!(
        matches!(lookup, Err(GenerationServiceError::NotFound(_))),
        "expected not found, got {lookup:?}"
    );
    Ok(())
}

#[then(r#"the stored tests are exactly "{expected}""#)]
fn stored_tests_are_exactly(world: &GenerationWorld, expected: String) -> Result<(), eyre::Report> {
    let stored = world.stored_generation()?;
    eyre::ensure!(
        stored.generated_tests() == Some(expected.as_str()),
        "expected {expected:?}, found {:?}",
        stored.generated_tests()
    );
    Ok(())
}
