pub mod demographic_handler;

pub use demographic_handler::{
    __path_create_demographic, __path_delete_demographic, __path_get_demographic,
    __path_list_demographics, __path_update_demographic, create_demographic, delete_demographic,
    get_demographic, list_demographics, update_demographic,
};
