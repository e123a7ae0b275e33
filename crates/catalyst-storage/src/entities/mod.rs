pub mod blog_post;
pub mod career;
pub mod case_study;
pub mod contact_submission;
pub mod media_file;
pub mod process_step;
pub mod service;
pub mod site_setting;
pub mod team_member;
pub mod tech_item;
pub mod testimonial;
pub mod user;
