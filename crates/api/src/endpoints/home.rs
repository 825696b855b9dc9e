//! Home page.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{extractors::MaybeAuthUser, middleware::AppState};

#[derive(Serialize)]
struct Link {
    name: &'static str,
    href: &'static str,
}

/// Home view.
#[derive(Serialize)]
pub struct HomeView {
    site_name: String,
    username: Option<String>,
    links: Vec<Link>,
}

async fn home(State(state): State<AppState>, MaybeAuthUser(user): MaybeAuthUser) -> Json<HomeView> {
    let mut links = vec![
        Link {
            name: "ads",
            href: "/ads/",
        },
        Link {
            name: "cats",
            href: "/cats/",
        },
    ];
    if user.is_some() {
        links.push(Link {
            name: "logout",
            href: "/accounts/logout/",
        });
    } else {
        links.push(Link {
            name: "login",
            href: "/accounts/login/",
        });
        links.push(Link {
            name: "signup",
            href: "/accounts/signup/",
        });
    }

    Json(HomeView {
        site_name: state.config.server.site_name.clone(),
        username: user.map(|u| u.username),
        links,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}
