//! Given steps for generation pipeline BDD scenarios.

use super::world::GenerationWorld;
use rstest_bdd_macros::given;
use testsmith::generation::{adapters::scripted::ScriptedProvider, ports::ProviderError};

const FENCED_JAVASCRIPT_TESTS: &str = "```javascript\n\
describe('add', () => {\n  \
it('adds two numbers', () => {\n    \
expect(add(1, 2)).toBe(3);\n  \
});\n\
});\n\
```";

#[given("a provider that answers with fenced JavaScript tests")]
fn provider_answers_with_fenced_tests(world: &mut GenerationWorld) {
    world.install_provider(ScriptedProvider::answering(FENCED_JAVASCRIPT_TESTS));
}

#[given("a provider that is unreachable")]
fn provider_is_unreachable(world: &mut GenerationWorld) {
    world.install_provider(ScriptedProvider::failing(ProviderError::upstream(
        "error sending request: connection refused",
    )));
}

#[given("a provider that answers with a fenced JavaScript constant")]
fn provider_answers_with_fenced_constant(world: &mut GenerationWorld) {
    world.install_provider(ScriptedProvider::answering("```js\nconst x=1;\n```"));
}
