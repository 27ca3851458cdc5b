use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coachdesk",
    version,
    about = "Console for the Coachdesk fitness backends"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// YAML config file; COACHDESK_* variables are used when absent
    #[arg(long, global = true, env = "COACHDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results and logs as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),
    /// Log out and drop the stored token
    Logout,
    /// Print the effective configuration
    Config,
    /// Member and staff accounts
    #[command(subcommand)]
    Users(UsersCmd),
    /// Training plans
    #[command(subcommand)]
    Plans(PlansCmd),
    /// Exercise library
    #[command(subcommand)]
    Exercises(ExercisesCmd),
    /// Meal demonstrations
    #[command(subcommand)]
    MealDemos(MealDemosCmd),
    /// Terms and privacy policies
    #[command(subcommand)]
    Policies(PoliciesCmd),
    /// Advisor review queue
    #[command(subcommand)]
    Reviews(ReviewsCmd),
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "COACHDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub size: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct IdArg {
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum UsersCmd {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get(IdArg),
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "member")]
        role: String,
        #[arg(long)]
        password: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum PlansCmd {
    List {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get(IdArg),
    /// Ask the backend to generate a plan for a member
    Generate {
        #[arg(long)]
        user: String,
        #[arg(long)]
        goal: String,
        #[arg(long, default_value_t = 4)]
        weeks: u32,
        #[arg(long, default_value_t = 3)]
        days_per_week: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    Delete(IdArg),
}

#[derive(Args, Debug, Clone)]
pub struct ExerciseForm {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub muscle_group: Option<String>,
    #[arg(long)]
    pub difficulty: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Demo video file
    #[arg(long)]
    pub video: Option<PathBuf>,
    /// Step as `title` or `title:description`; repeat in order
    #[arg(long = "step")]
    pub steps: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ExercisesCmd {
    List {
        #[arg(long)]
        muscle_group: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get(IdArg),
    Create(ExerciseForm),
    Update {
        id: String,
        #[command(flatten)]
        form: ExerciseForm,
    },
    Delete(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum MealDemosCmd {
    List(PageArgs),
    Get(IdArg),
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        calories: Option<u32>,
        /// Dish photo
        #[arg(long)]
        image: Option<PathBuf>,
        /// Ingredient as `name:quantity:unit`; repeat for each
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },
    Delete(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum PoliciesCmd {
    List,
    Get(IdArg),
    /// Create a policy, or replace it when --id is given
    Upsert {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        kind: String,
        #[arg(long)]
        title: String,
        /// File holding the policy text
        #[arg(long)]
        content_file: PathBuf,
    },
    Delete(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum ReviewsCmd {
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        advisor: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get(IdArg),
    Approve {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    Reject {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
}
