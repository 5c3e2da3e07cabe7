use oso::{Oso, PolarClass};

use crate::auth::{Console, User};
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(Console::get_polar_class())?;
    o.register_class(User::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[test]
fn admin_role_test() {
    let authorizor = new().unwrap();
    let admin = User::admin("admin-1");

    for action in ["read", "manage_clubs", "review_applications", "manage_members"] {
        let result = authorizor.is_allowed(admin.clone(), action, Console::default());
        assert_eq!(result.unwrap(), true);
    }
}

#[test]
fn viewer_role_test() {
    let authorizor = new().unwrap();
    let viewer = User::viewer("viewer-1");

    let result = authorizor.is_allowed(viewer.clone(), "read", Console::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(viewer.clone(), "manage_members", Console::default());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(viewer.clone(), "review_applications", Console::default());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn unprivileged_user_test() {
    let authorizor = new().unwrap();
    let applicant = User::new("someone", vec![]);

    let result = authorizor.is_allowed(applicant.clone(), "submit_application", Console::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(applicant.clone(), "read", Console::default());
    assert_eq!(result.unwrap(), false);
}
