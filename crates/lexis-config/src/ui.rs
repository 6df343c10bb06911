use serde::{Deserialize, Serialize};

fn default_show_prompt() -> bool {
    true
}

fn default_print_list_on_refresh() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Print a `> ` prompt when stdin is a terminal
    #[serde(default = "default_show_prompt")]
    pub show_prompt: bool,
    /// Reprint the word list whenever it is replaced
    #[serde(default = "default_print_list_on_refresh")]
    pub print_list_on_refresh: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_prompt: default_show_prompt(),
            print_list_on_refresh: default_print_list_on_refresh(),
        }
    }
}
