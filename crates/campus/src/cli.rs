//! Clap derive structures for the `campus` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap and clap_complete are used here so `build.rs` can include it.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// campus -- school administration from the command line
#[derive(Debug, Parser)]
#[command(
    name = "campus",
    version,
    about = "Manage a school backend from the command line",
    long_about = "Administer grades, sections, subjects and weekly schedules,\n\
        manage teachers, students and parents, and handle announcements,\n\
        feedback and attendance on a campus backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "CAMPUS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "CAMPUS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides stored session)
    #[arg(long, env = "CAMPUS_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CAMPUS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "CAMPUS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CAMPUS_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Headline counts for the current user
    #[command(alias = "dash")]
    Dashboard,

    /// Grades, sections, subjects and schedules
    #[command(alias = "ac")]
    Academics(AcademicsArgs),

    /// Manage teachers
    #[command(alias = "t")]
    Teachers(TeachersArgs),

    /// Manage students
    #[command(alias = "s")]
    Students(StudentsArgs),

    /// Manage parents
    Parents(ParentsArgs),

    /// Read and send feedback
    #[command(alias = "fb")]
    Feedback(FeedbackArgs),

    /// Read and publish announcements
    #[command(alias = "ann")]
    Announcements(AnnouncementsArgs),

    /// Browse classes
    Classes(ClassesArgs),

    /// Browse the subject catalog
    Subjects(SubjectsArgs),

    /// Take attendance for your classes
    Attendance(AttendanceArgs),

    /// View and edit your own account
    Profile(ProfileArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "CAMPUS_PASSWORD", hide_env = true)]
    pub password: Option<String>,

    /// Keep the token in the config file instead of the keyring
    #[arg(long)]
    pub plaintext: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACADEMICS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AcademicsArgs {
    #[command(subcommand)]
    pub command: AcademicsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AcademicsCommand {
    /// Show the grade → section / subject tree
    Tree {
        /// Filter grades by grade, section or subject name
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Include student rosters under sections
        #[arg(long)]
        students: bool,
    },

    /// Add, rename or delete grades
    Grade {
        #[command(subcommand)]
        command: GradeCommand,
    },

    /// Add, rename or delete sections
    Section {
        #[command(subcommand)]
        command: SectionCommand,
    },

    /// Add, rename or delete subjects of a grade
    Subject {
        #[command(subcommand)]
        command: SubjectCommand,
    },

    /// Weekly schedule of a section
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum GradeCommand {
    /// Add a grade
    Add {
        /// Grade name, e.g. "10th"
        name: String,
    },

    /// Rename a grade
    Rename {
        /// Current grade name
        grade: String,

        /// New name
        name: String,
    },

    /// Delete a grade with all of its sections and subjects
    #[command(alias = "rm")]
    Delete {
        /// Grade name
        grade: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SectionCommand {
    /// Add a section to a grade
    Add {
        /// Owning grade name
        #[arg(long, short = 'g')]
        grade: String,

        /// Section name, e.g. "A"
        name: String,
    },

    /// Rename a section
    Rename {
        /// Section ID
        id: u64,

        /// New name
        name: String,
    },

    /// Delete a section
    #[command(alias = "rm")]
    Delete {
        /// Section ID
        id: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubjectCommand {
    /// Add a subject to a grade
    Add {
        /// Owning grade name
        #[arg(long, short = 'g')]
        grade: String,

        /// Subject name
        name: String,

        /// Subject code, e.g. "MATH-10"
        #[arg(long, short = 'c')]
        code: String,
    },

    /// Rename a subject
    Rename {
        /// Subject ID
        id: u64,

        /// New name
        name: String,
    },

    /// Remove a subject from a grade
    #[command(alias = "rm")]
    Delete {
        /// Subject ID
        id: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Render the weekly grid of a section
    Show {
        /// Section ID (defaults to the first section of the first grade)
        #[arg(long, short = 's')]
        section: Option<u64>,
    },

    /// List the entries of a section, sorted by day and time
    #[command(alias = "ls")]
    List {
        /// Section ID (defaults to the first section of the first grade)
        #[arg(long, short = 's')]
        section: Option<u64>,
    },

    /// Add a weekly entry
    Add {
        /// Section ID
        #[arg(long, short = 's')]
        section: u64,

        /// Subject ID
        #[arg(long)]
        subject: u64,

        /// Day of week
        #[arg(long, short = 'd', value_enum)]
        day: Day,

        /// Start time (HH:MM)
        #[arg(long, default_value = "08:00")]
        start: String,

        /// End time (HH:MM)
        #[arg(long, default_value = "09:30")]
        end: String,

        /// Room
        #[arg(long, short = 'r', default_value = "")]
        room: String,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Section the entry belongs to
        #[arg(long, short = 's')]
        section: u64,

        /// Schedule entry ID
        id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PEOPLE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fields shared by create / update of every person type.
#[derive(Debug, Args)]
pub struct PersonFields {
    /// Full name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Email address
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (required on create, unchanged on update when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring filter
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct TeachersArgs {
    #[command(subcommand)]
    pub command: TeachersCommand,
}

#[derive(Debug, Subcommand)]
pub enum TeachersCommand {
    /// List teachers
    #[command(alias = "ls")]
    List(SearchArgs),

    /// Show one teacher with assignments
    Get { id: u64 },

    /// Create a teacher
    Create {
        #[command(flatten)]
        fields: PersonFields,

        /// Class/subject assignment as CLASS_ID:SUBJECT_ID (repeatable)
        #[arg(long = "assign", value_name = "CLASS:SUBJECT")]
        assignments: Vec<String>,
    },

    /// Update a teacher
    Update {
        id: u64,

        #[command(flatten)]
        fields: PersonFields,

        /// Replace assignments with CLASS_ID:SUBJECT_ID pairs (repeatable)
        #[arg(long = "assign", value_name = "CLASS:SUBJECT")]
        assignments: Vec<String>,
    },

    /// Delete a teacher
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Debug, Args)]
pub struct StudentsArgs {
    #[command(subcommand)]
    pub command: StudentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List students
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        search: SearchArgs,

        /// Only students of this grade (class name)
        #[arg(long, short = 'g')]
        grade: Option<String>,
    },

    /// Show one student
    Get { id: u64 },

    /// Create a student
    Create {
        #[command(flatten)]
        fields: PersonFields,

        /// Class ID
        #[arg(long)]
        class: Option<u64>,
    },

    /// Update a student
    Update {
        id: u64,

        #[command(flatten)]
        fields: PersonFields,

        /// Class ID
        #[arg(long)]
        class: Option<u64>,
    },

    /// Delete a student
    #[command(alias = "rm")]
    Delete { id: u64 },

    /// Highest average scores
    Top {
        #[arg(long, short = 'l', default_value = "5")]
        limit: usize,
    },
}

#[derive(Debug, Args)]
pub struct ParentsArgs {
    #[command(subcommand)]
    pub command: ParentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ParentsCommand {
    /// List parents
    #[command(alias = "ls")]
    List(SearchArgs),

    /// Show one parent with linked students
    Get { id: u64 },

    /// Create a parent
    Create {
        #[command(flatten)]
        fields: PersonFields,

        /// Linked student ID (repeatable)
        #[arg(long = "student")]
        students: Vec<u64>,
    },

    /// Update a parent
    Update {
        id: u64,

        #[command(flatten)]
        fields: PersonFields,

        /// Replace linked students (repeatable)
        #[arg(long = "student")]
        students: Vec<u64>,
    },

    /// Delete a parent
    #[command(alias = "rm")]
    Delete { id: u64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FEEDBACK & ANNOUNCEMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FeedbackArgs {
    #[command(subcommand)]
    pub command: FeedbackCommand,
}

#[derive(Debug, Subcommand)]
pub enum FeedbackCommand {
    /// List received feedback
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        search: SearchArgs,

        /// Only unread items
        #[arg(long, short = 'u')]
        unread: bool,
    },

    /// Send feedback
    Send {
        message: String,

        #[arg(long = "type", short = 't', value_enum, default_value = "feedback")]
        kind: FeedbackType,
    },

    /// Mark an item as read
    Read { id: u64 },

    /// Delete an item
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedbackType {
    Feedback,
    Bug,
    Suggestion,
}

#[derive(Debug, Args)]
pub struct AnnouncementsArgs {
    #[command(subcommand)]
    pub command: AnnouncementsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnnouncementsCommand {
    /// List announcements
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        search: SearchArgs,

        /// Only announcements for this audience
        #[arg(long, short = 'a', value_enum)]
        audience: Option<Audience>,
    },

    /// Publish an announcement
    Create {
        #[arg(long, short = 't')]
        title: String,

        #[arg(long, short = 'm')]
        message: String,

        #[arg(long, short = 'a', value_enum, default_value = "all")]
        audience: Audience,

        /// Target class ID (required for --audience class)
        #[arg(long)]
        class: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Audience {
    All,
    Teacher,
    Student,
    Parent,
    Class,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLASSES, SUBJECTS & ATTENDANCE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClassesArgs {
    #[command(subcommand)]
    pub command: ClassesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClassesCommand {
    /// List classes
    #[command(alias = "ls")]
    List {
        /// Only the classes you teach
        #[arg(long)]
        mine: bool,
    },

    /// Show a class with its roster
    Get { id: u64 },
}

#[derive(Debug, Args)]
pub struct SubjectsArgs {
    #[command(subcommand)]
    pub command: SubjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubjectsCommand {
    /// List the subject catalog
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    pub command: AttendanceCommand,
}

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// List the classes you can take attendance for
    Classes,

    /// Submit attendance for a class; unlisted students are present
    Mark {
        /// Class ID
        class: u64,

        /// Day (YYYY-MM-DD, defaults to today)
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Absent student IDs
        #[arg(long, value_delimiter = ',')]
        absent: Vec<u64>,

        /// Late student IDs
        #[arg(long, value_delimiter = ',')]
        late: Vec<u64>,

        /// Excused student IDs
        #[arg(long, value_delimiter = ',')]
        excused: Vec<u64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show your account and preferences
    Show,

    /// Change name and email
    Update {
        #[arg(long, short = 'n')]
        name: Option<String>,

        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// Change your password (prompted)
    Password,

    /// Show preferences, or flip one
    Prefs {
        /// Preference to toggle
        #[arg(value_enum)]
        toggle: Option<PrefKey>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrefKey {
    Notifications,
    DarkMode,
    Biometric,
    Analytics,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
