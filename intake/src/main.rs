//! Intake binary entry point

use std::path::PathBuf;

use clap::Parser;

use intake::{IntakeFlow, RealRegistrationApi, RealWishlistApi, SystemClock, WishlistService};
use shared::logging::{init_tracing_with_level, log_error, log_startup, log_success, ComponentId};
use shared::{ActionGuard, ClientConfig, CourseListing, FileStore, ListingId, ListingSource, PendingRegistration};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Register a student for a course intake")]
struct Args {
    /// Stored student identifier, e.g. "WC1042" (falls back to the store)
    #[arg(long)]
    student_id: Option<String>,

    /// College course id of the listing
    #[arg(long)]
    college_course_id: String,

    /// Course id of the listing
    #[arg(long)]
    course_id: String,

    /// University id of the listing
    #[arg(long, default_value = "")]
    university_id: String,

    /// Intake month code, e.g. SEP
    #[arg(long)]
    month: String,

    /// Intake year
    #[arg(long)]
    year: i32,

    /// Optional remarks (capped at 500 characters)
    #[arg(long)]
    remarks: Option<String>,

    /// Months the course is offered in, comma separated (all when empty)
    #[arg(long, value_delimiter = ',')]
    intake_months: Vec<String>,

    /// Also add the course to the student's wishlist
    #[arg(long)]
    wishlist: bool,

    /// Marketplace API base URL (overrides COURSE_API_BASE_URL)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Directory of the durable store (overrides CLIENT_CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Log level (overrides LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.api_base_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(dir) = args.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    let component = ComponentId::init_intake();
    init_tracing_with_level(Some(&config.log_level));
    log_startup(component, &format!("intake registration against {}", config.api_base_url));

    let pending = PendingRegistration {
        university_id: args.university_id,
        course_id: args.course_id,
        college_course_id: args.college_course_id,
        available_intake_months: args.intake_months,
        course_name: String::new(),
        university_name: String::new(),
    };
    let guard = ActionGuard::new();

    if args.wishlist {
        let identifier = args.student_id.clone().unwrap_or_default();
        let wishlist = WishlistService::new(
            RealWishlistApi::new(&config.api_base_url, config.request_timeout())?,
            guard.clone(),
        );
        let mut listing = wishlist_listing(&pending);
        match wishlist.add(&identifier, &mut listing).await {
            Ok(outcome) => println!("Wishlist: {outcome:?}"),
            Err(e) => log_error(component, "Wishlist add", &e),
        }
    }

    let api = RealRegistrationApi::new(&config.api_base_url, config.request_timeout())?;
    let mut flow = IntakeFlow::new(api, FileStore::new(&config.cache_dir), SystemClock, guard);
    if let Some(identifier) = args.student_id {
        flow = flow.with_student_identifier(identifier);
    }

    flow.open(pending)?;
    flow.select_month(&args.month)?;
    flow.select_year(args.year)?;
    if let Some(remarks) = &args.remarks {
        flow.set_remarks(remarks)?;
    }

    match flow.submit().await {
        Ok(record) => {
            println!("Registered for {} (registration {})", record.intake_session, record.registration_id);
            flow.done()?;
            log_success(component, "Registration stored");
            Ok(())
        }
        Err(e) => {
            if let Some(notice) = flow.state().notice() {
                println!("{}", notice.message());
            }
            log_error(component, "Registration", &e);
            Err(e.into())
        }
    }
}

/// Minimal listing for the wishlist action
fn wishlist_listing(pending: &PendingRegistration) -> CourseListing {
    CourseListing {
        id: ListingId::new(pending.university_id.clone(), pending.course_id.clone()),
        college_course_id: pending.college_course_id.clone(),
        course_name: pending.course_name.clone(),
        university_name: pending.university_name.clone(),
        location: String::new(),
        country: String::new(),
        level: None,
        fee: 0,
        ranking: None,
        rating: None,
        intake_months: pending.available_intake_months.clone(),
        exams: Vec::new(),
        duration_months: None,
        scholarship_available: false,
        is_favorited: false,
        source: ListingSource::Backend,
    }
}
