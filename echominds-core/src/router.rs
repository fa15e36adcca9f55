use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EchoMindsError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    #[default]
    Home,
    Chat,
    MyChats,
    Explore,
    Create,
    Settings,
}

impl Route {
    pub fn all() -> &'static [Route] {
        &[
            Route::Home,
            Route::Chat,
            Route::MyChats,
            Route::Explore,
            Route::Create,
            Route::Settings,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Chat => "chat",
            Route::MyChats => "my-chats",
            Route::Explore => "explore",
            Route::Create => "create",
            Route::Settings => "settings",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Chat => "Chat",
            Route::MyChats => "My Chats",
            Route::Explore => "Explore",
            Route::Create => "Create",
            Route::Settings => "Settings",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Route {
    type Err = EchoMindsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| EchoMindsError::ValidationError(format!("Unknown route: {}", s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterState {
    pub current_route: Route,
    pub selected_character_id: Option<String>,
}

/// Currently selected top-level view. There is no history stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    state: RouterState,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    pub fn current_route(&self) -> Route {
        self.state.current_route
    }

    pub fn selected_character_id(&self) -> Option<&str> {
        self.state.selected_character_id.as_deref()
    }

    fn go(&mut self, route: Route, character_id: Option<String>) {
        self.state = RouterState {
            current_route: route,
            selected_character_id: character_id,
        };
    }

    pub fn navigate_to_chat(&mut self, character_id: impl Into<String>) {
        self.go(Route::Chat, Some(character_id.into()));
    }

    pub fn navigate_to_home(&mut self) {
        self.go(Route::Home, None);
    }

    pub fn navigate_to_my_chats(&mut self) {
        self.go(Route::MyChats, None);
    }

    pub fn navigate_to_explore(&mut self) {
        self.go(Route::Explore, None);
    }

    pub fn navigate_to_create(&mut self) {
        self.go(Route::Create, None);
    }

    pub fn navigate_to_settings(&mut self) {
        self.go(Route::Settings, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_home() {
        let router = Router::new();
        assert_eq!(router.current_route(), Route::Home);
        assert!(router.selected_character_id().is_none());
    }

    #[test]
    fn test_chat_selects_character() {
        let mut router = Router::new();
        router.navigate_to_chat("3");
        assert_eq!(router.current_route(), Route::Chat);
        assert_eq!(router.selected_character_id(), Some("3"));

        router.navigate_to_chat("5");
        assert_eq!(router.selected_character_id(), Some("5"));
    }

    #[test]
    fn test_other_routes_clear_selection() {
        let navigations: [(fn(&mut Router), Route); 5] = [
            (Router::navigate_to_home, Route::Home),
            (Router::navigate_to_my_chats, Route::MyChats),
            (Router::navigate_to_explore, Route::Explore),
            (Router::navigate_to_create, Route::Create),
            (Router::navigate_to_settings, Route::Settings),
        ];

        for (navigate, expected) in navigations {
            let mut router = Router::new();
            router.navigate_to_chat("1");
            navigate(&mut router);
            assert_eq!(router.current_route(), expected);
            assert!(router.selected_character_id().is_none());
        }
    }

    #[test]
    fn test_route_serde_is_kebab_case() {
        let json = serde_json::to_string(&Route::MyChats).unwrap();
        assert_eq!(json, "\"my-chats\"");

        let mut router = Router::new();
        router.navigate_to_chat("2");
        let value = serde_json::to_value(router.state()).unwrap();
        assert_eq!(value["currentRoute"], "chat");
        assert_eq!(value["selectedCharacterId"], "2");
    }

    #[test]
    fn test_route_from_str() {
        assert_eq!("explore".parse::<Route>().unwrap(), Route::Explore);
        assert_eq!("my-chats".parse::<Route>().unwrap(), Route::MyChats);
        assert!("profile".parse::<Route>().is_err());
        assert_eq!(Route::Settings.name(), "Settings");
    }
}
