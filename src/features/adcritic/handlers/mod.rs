pub mod ad_critic_handler;

pub use ad_critic_handler::{
    __path_analyze_ad, __path_get_ad_analysis, __path_list_ad_analyses, analyze_ad,
    get_ad_analysis, list_ad_analyses,
};
