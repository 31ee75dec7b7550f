use std::collections::HashMap;

use axum_template::engine::Engine;
use derive_new::new;
use snafu::ResultExt as _;
use tera::{Tera, Value};

use super::{Result, TemplateSnafu};
use crate::harvest::Harvester;
use crate::model::numerize;

pub type Templates = Engine<Tera>;

#[derive(Clone, new)]
pub struct App {
    pub harvester: Harvester,
    pub templates: Templates,
}

pub fn create_app(harvester: Harvester) -> Result<App> {
    Ok(App::new(harvester, templates()?))
}

/// The page templates are compiled into the binary.
pub fn templates() -> Result<Templates> {
    let mut tera = Tera::default();
    tera.add_raw_templates([
        ("base.html", include_str!("../../templates/base.html.tera")),
        ("index.html", include_str!("../../templates/index.html.tera")),
    ])
    .context(TemplateSnafu)?;
    tera.register_filter("numerize", numerize_filter);

    Ok(Engine::from(tera))
}

fn numerize_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_i64() {
        Some(count) => Ok(Value::String(numerize(count))),
        None => Err(tera::Error::msg(format!("numerize expects an integer, got `{value}`"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numerize_filter_formats_integers() {
        let value = numerize_filter(&json!(1_500_000), &HashMap::new()).unwrap();
        assert_eq!(value, json!("1.5M"));

        assert!(numerize_filter(&json!("many"), &HashMap::new()).is_err());
    }

    #[test]
    fn templates_compile() {
        assert!(templates().is_ok());
    }
}
