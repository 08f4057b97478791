use std::collections::HashSet;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use database::{
    consts::consts::PersonId,
    database::{
        database::Database,
        options::DatabaseOptions,
        table::query::{paginate, sort, PageRequest, SortDirection, SortKey},
    },
    model::{form::PersonForm, statement::StatementResult},
    persistence::storage::StorageEngine,
};
use personstore::{
    i18n::i18n::{translate, Key, Locale},
    view::table::{render_page, render_person, DEFAULT_PAGE_SIZE},
};

/// 📀 Personstore, keeps a list of person records in a local data directory
///
/// Records survive between runs, every change is written to `<data>/persons.json`
#[derive(Parser, Debug)]
struct Cli {
    /// Location of the data directory. Reads / writes to this directory. Note: Does not support shell paths, e.g. ~
    #[clap(short, long, global = true, default_value = "data")]
    data: std::path::PathBuf,

    /// Language of labels and messages: en or th
    #[clap(short, long, global = true, default_value = "en")]
    lang: Locale,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shows the person table
    List {
        /// insertion or name
        #[clap(long, default_value = "insertion")]
        sort: SortKey,

        #[clap(long)]
        desc: bool,

        #[clap(long, default_value_t = 1)]
        page: usize,

        #[clap(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Shows every field of one person
    Show { id: PersonId },
    /// Submits the form as a new person
    Add(FormArgs),
    /// Submits the form for an existing person, fields left out keep their value
    Edit {
        #[clap(long)]
        id: PersonId,

        #[clap(flatten)]
        fields: FormArgs,
    },
    /// Deletes one person
    Delete { id: PersonId },
    /// Deletes every listed person, or everyone with --all
    DeleteMany {
        #[clap(required_unless_present = "all")]
        ids: Vec<PersonId>,

        #[clap(long, conflicts_with = "ids")]
        all: bool,
    },
}

#[derive(Args, Debug)]
struct FormArgs {
    /// Mr., Ms. or Mrs.
    #[clap(long)]
    title: Option<String>,

    #[clap(long)]
    firstname: Option<String>,

    #[clap(long)]
    lastname: Option<String>,

    /// YYYY-MM-DD
    #[clap(long)]
    birthday: Option<String>,

    /// American, Canadian or British
    #[clap(long)]
    nationality: Option<String>,

    /// 1-2345-67890-12-3
    #[clap(long)]
    citizen_id: Option<String>,

    /// Male, Female or Unisex
    #[clap(long)]
    gender: Option<String>,

    /// +66 (default), +1 or +44
    #[clap(long, allow_hyphen_values = true)]
    country_code: Option<String>,

    /// Local number, stored behind the country code
    #[clap(long)]
    mobile_phone: Option<String>,

    #[clap(long)]
    passport_no: Option<String>,

    #[clap(long)]
    expected_salary: Option<String>,
}

impl From<FormArgs> for PersonForm {
    fn from(args: FormArgs) -> Self {
        PersonForm {
            title: args.title,
            firstname: args.firstname,
            lastname: args.lastname,
            birthday: args.birthday,
            nationality: args.nationality,
            citizen_id: args.citizen_id,
            gender: args.gender,
            country_code: args.country_code,
            mobile_phone: args.mobile_phone,
            passport_no: args.passport_no,
            expected_salary: args.expected_salary,
            ..PersonForm::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let database_options =
        DatabaseOptions::default().set_storage_engine(StorageEngine::File(args.data.clone()));

    let mut database = Database::from_options(&database_options)
        .with_context(|| format!("cannot open data directory {}", args.data.display()))?;

    run(&mut database, args.lang, args.command)
}

fn run(database: &mut Database, locale: Locale, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List {
            sort: sort_key,
            desc,
            page,
            page_size,
        } => {
            let direction = match desc {
                true => SortDirection::Descending,
                false => SortDirection::Ascending,
            };

            let sorted = sort(database.list(), sort_key, direction);
            let page = paginate(sorted, PageRequest { page, page_size });

            print!("{}", render_page(locale, &page));
        }
        Command::Show { id } => match database.get(id) {
            Some(person) => print!("{}", render_person(locale, person)),
            None => bail!("no person with id {}", id),
        },
        Command::Add(fields) => {
            let statement = PersonForm::from(fields).submit(None)?;

            if let StatementResult::Single(person) = database.apply(statement)? {
                println!("{}: #{}", translate(locale, Key::Submit), person.id);
            }
        }
        Command::Edit { id, fields } => {
            let Some(existing) = database.get(id) else {
                bail!("no person with id {}", id);
            };

            let mut form = PersonForm::from_person(existing);
            form.apply_changes(fields.into());

            match database.apply(form.submit(Some(id))?)? {
                StatementResult::Updated(Some(person)) => {
                    println!("{}: #{}", translate(locale, Key::Edit), person.id)
                }
                _ => log::warn!("Person [{}] disappeared before the edit was saved", id),
            }
        }
        Command::Delete { id } => {
            let removed = database.delete_one(id)?;

            println!("{}: {}", translate(locale, Key::Delete), removed);
        }
        Command::DeleteMany { ids, all } => {
            let selected: HashSet<PersonId> = match all {
                true => {
                    println!("{}", translate(locale, Key::SelectAll));
                    database.list().iter().map(|person| person.id).collect()
                }
                false => ids.into_iter().collect(),
            };

            let removed = database.delete_many(&selected)?;

            println!("{}: {}", translate(locale, Key::Delete), removed);
        }
    }

    Ok(())
}
