use oso::PolarClass;
use serde::{Deserialize, Serialize};

/// The administrative console; every policy check is made against it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Console {
    name: String,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            name: "clubhouse".into(),
        }
    }
}

impl PolarClass for Console {
    fn get_polar_class_builder() -> oso::ClassBuilder<Console> {
        oso::Class::builder()
            .name("Console")
            .add_attribute_getter("name", |recv: &Console| recv.name.clone())
            .add_class_method("default", Console::default)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Console::get_polar_class_builder();
        builder.build()
    }
}
