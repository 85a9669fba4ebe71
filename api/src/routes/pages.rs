//! Browser pages
//!
//! Every page resolves the optional session user for the header. Failures
//! are rendered as HTML error pages by the error rendering middleware.

use actix_web::{http::header::ContentType, web, HttpRequest, HttpResponse};

use crate::dto::{validate_request, UserDataForm};
use crate::handlers::{ApiError, ApiResult};
use crate::middleware::{Authenticated, MaybeUser, Protect};
use crate::state::AppState;
use crate::views;

use super::query_params;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(overview))
        .route("/tour/{slug}", web::get().to(tour))
        .route("/login", web::get().to(login))
        .route("/signup", web::get().to(signup))
        .route("/me", web::get().to(account).wrap(Protect::any()))
        .route("/my-tours", web::get().to(my_tours).wrap(Protect::any()))
        .route(
            "/submit-user-data",
            web::post().to(submit_user_data).wrap(Protect::any()),
        );
}

fn html(page: views::PageResult) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page?))
}

fn alert(req: &HttpRequest) -> Option<&'static str> {
    views::alert_message(query_params(req).get("alert"))
}

async fn overview(
    req: HttpRequest,
    state: web::Data<AppState>,
    MaybeUser(user): MaybeUser,
) -> ApiResult<HttpResponse> {
    let tours = state.tours.overview().await?;
    html(views::overview_page(
        "All Tours",
        &tours,
        user.as_ref(),
        alert(&req),
    ))
}

async fn tour(
    state: web::Data<AppState>,
    MaybeUser(user): MaybeUser,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let detail = state
        .tours
        .detail_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("There is no tour with that name.".to_string()))?;
    html(views::tour_page(&detail, user.as_ref()))
}

async fn login(MaybeUser(user): MaybeUser) -> ApiResult<HttpResponse> {
    html(views::login_page(user.as_ref()))
}

async fn signup(MaybeUser(user): MaybeUser) -> ApiResult<HttpResponse> {
    html(views::signup_page(user.as_ref()))
}

async fn account(Authenticated(user): Authenticated) -> ApiResult<HttpResponse> {
    html(views::account_page(&user))
}

/// Tours the user has paid for
async fn my_tours(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(user): Authenticated,
) -> ApiResult<HttpResponse> {
    let tours = state.bookings.my_tours(user.id).await?;
    html(views::overview_page(
        "My Tours",
        &tours,
        Some(&user),
        alert(&req),
    ))
}

/// Form post from the account page; re-renders it with the saved values
async fn submit_user_data(
    state: web::Data<AppState>,
    Authenticated(user): Authenticated,
    form: web::Form<UserDataForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    validate_request(&form)?;
    let updated = state.users.update_me(user.id, form.into()).await?;
    html(views::account_page(&updated))
}
