use askama::Template;

use tours_core::domain::entities::User;

use super::{render, Page, PageResult};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    page: Page<'a>,
}

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupTemplate<'a> {
    page: Page<'a>,
}

#[derive(Template)]
#[template(path = "account.html")]
struct AccountTemplate<'a> {
    page: Page<'a>,
    user: &'a User,
}

pub fn login_page(user: Option<&User>) -> PageResult {
    render(&LoginTemplate {
        page: Page::new("Log into your account", user),
    })
}

pub fn signup_page(user: Option<&User>) -> PageResult {
    render(&SignupTemplate {
        page: Page::new("Create your account", user),
    })
}

/// Account settings; the data form posts to `/submit-user-data`
pub fn account_page(user: &User) -> PageResult {
    render(&AccountTemplate {
        page: Page::new("Your account", Some(user)),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_page_prefills_escaped_values() {
        let user = User::new("Ann \"The\" Hiker", "ann@example.com", "hash");
        let html = account_page(&user).unwrap();
        assert!(html.contains(r#"value="Ann &quot;The&quot; Hiker""#));
        assert!(html.contains(r#"value="ann@example.com""#));
        assert!(html.contains(r#"action="/submit-user-data""#));
    }

    #[test]
    fn test_login_page_title() {
        let html = login_page(None).unwrap();
        assert!(html.contains("Natours | Log into your account"));
        assert!(html.contains(r#"data-endpoint="/api/v1/users/login""#));
    }
}
