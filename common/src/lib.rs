//! Shared types for the careers site.
//!
//! Everything in here is pure: DTOs mirrored from the CMS, the URL query
//! codec for job filters, the CMS `where` query builder and the pagination
//! window. The `client` and `server` crates do the I/O.

pub mod cms_query;
pub mod contact;
pub mod model;
pub mod pagination;
pub mod richtext;
pub mod search;

pub use cms_query::{CmsQuery, Condition, Operator};
pub use contact::{ContactSubmission, FieldError, ValidationErrors};
pub use model::{
    BlogPost, Company, EmploymentType, JobPost, JobStatus, Media, Paginated, PublishStatus,
    Relation,
};
pub use pagination::{PageItem, page_window};
pub use search::{FilterKey, JobSearchParams, PostListParams, SortKey};
