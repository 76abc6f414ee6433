use anyhow::{Context, Result, anyhow};
use catalog::{MovieId, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use store::dto::{DatePage, GenrePage, MovieDetail, MovieSummary, ReviewView, SimilarMovie};
use store::{MemoryRepository, SharedStore, StoreConfig, loader, services};

/// How many "more like this" cards a movie page shows
const SIMILAR_LIMIT: usize = 4;

/// ReelReviews - Movie catalog with reviews
#[derive(Parser)]
#[command(name = "reel-reviews")]
#[command(about = "Browse movies by date and genre, search titles and post reviews", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the CSV seed files (overrides the config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one movie with its genres, reviews and similar movies
    Movie {
        #[arg(long)]
        id: MovieId,
    },

    /// Show the movie with a given rank (first column of the movies file)
    Rank {
        #[arg(long)]
        rank: MovieId,
    },

    /// List the movies released on a date
    Date {
        /// Date as YYYY-MM-DD (defaults to the earliest release)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Page through a genre, optionally filtered by a fuzzy title search
    Browse {
        /// Genre name, or "all"
        #[arg(long, default_value = "all")]
        genre: String,

        /// Approximate title to search for
        #[arg(long)]
        search: Option<String>,

        /// Offset of the first movie on the page
        #[arg(long, default_value = "0")]
        cursor: usize,
    },

    /// List genre names
    Genres,

    /// Pick distinct movies at random
    Random {
        #[arg(long, default_value = "3")]
        count: usize,
    },

    /// Register a new user
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Log in and review a movie
    Review {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        movie_id: MovieId,

        #[arg(long)]
        text: String,

        #[arg(long)]
        rating: i32,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(?config, "Using configuration");

    let start = Instant::now();
    let mut repo = MemoryRepository::with_query_engine(config.query_engine());
    loader::populate(&config.data_dir, &mut repo, &config)
        .with_context(|| format!("Failed to load catalog from {}", config.data_dir.display()))?;
    if !cli.json {
        println!("{} Loaded catalog in {:?}", "✓".green(), start.elapsed());
    }
    let store = SharedStore::new(repo);

    match cli.command {
        Commands::Movie { id } => handle_movie(&store, id, cli.json)?,
        Commands::Rank { rank } => handle_rank(&store, rank, cli.json)?,
        Commands::Date { date } => handle_date(&store, date, cli.json)?,
        Commands::Browse {
            genre,
            search,
            cursor,
        } => handle_browse(&store, &config, &genre, search.as_deref(), cursor, cli.json)?,
        Commands::Genres => handle_genres(&store, cli.json)?,
        Commands::Random { count } => handle_random(&store, count, cli.json)?,
        Commands::Register { username, password } => {
            handle_register(&store, &config, &username, &password, cli.json)?
        }
        Commands::Review {
            username,
            password,
            movie_id,
            text,
            rating,
        } => handle_review(&store, &username, &password, movie_id, &text, rating, cli.json)?,
    }

    Ok(())
}

/// Handle the 'movie' command
fn handle_movie(store: &SharedStore, id: MovieId, json: bool) -> Result<()> {
    let repo = store.read();
    let movie = services::get_movie(id, &repo)?;

    let similar_ids: Vec<MovieId> = movie
        .genres
        .first()
        .map(|genre| services::get_movie_ids_for_genre(None, &genre.name, &repo))
        .unwrap_or_default()
        .into_iter()
        .filter(|&other| Some(other) != movie.id)
        .take(SIMILAR_LIMIT)
        .collect();
    let similar = services::get_similar_movies(&similar_ids, &repo);

    if json {
        #[derive(Serialize)]
        struct MoviePage<'a> {
            movie: &'a MovieDetail,
            similar: &'a [SimilarMovie],
        }
        return print_json(&MoviePage {
            movie: &movie,
            similar: &similar,
        });
    }

    print_movie(&movie);
    if !similar.is_empty() {
        println!("{}", "More like this:".bold());
        for other in &similar {
            println!(
                "  {} {} ({}) [{}]",
                "•".cyan(),
                other.title,
                other.director,
                other.genres.join(", ")
            );
        }
    }
    Ok(())
}

/// Handle the 'rank' command
fn handle_rank(store: &SharedStore, rank: MovieId, json: bool) -> Result<()> {
    let movie = services::get_movie_by_rank(rank, &store.read())?;
    if json {
        return print_json(&movie);
    }
    print_movie(&movie);
    Ok(())
}

/// Handle the 'date' command
fn handle_date(store: &SharedStore, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let repo = store.read();
    let date = match date {
        Some(date) => date,
        None => {
            services::get_first_movie(&repo)
                .ok_or_else(|| anyhow!("The catalog is empty"))?
                .date
        }
    };

    let page = services::get_movies_by_date(date, &repo);
    if json {
        return print_json(&page);
    }
    print_date_page(&page);
    Ok(())
}

/// Handle the 'browse' command
fn handle_browse(
    store: &SharedStore,
    config: &StoreConfig,
    genre: &str,
    search: Option<&str>,
    cursor: usize,
    json: bool,
) -> Result<()> {
    let page = services::browse_genre(genre, search, cursor, config.movies_per_page, &store.read());
    if json {
        return print_json(&page);
    }
    print_genre_page(&page);
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(store: &SharedStore, json: bool) -> Result<()> {
    let names = services::get_genre_names(&store.read());
    if json {
        return print_json(&names);
    }
    println!("{}", "Genres:".bold().blue());
    for name in names {
        println!("  {} {}", "•".green(), name);
    }
    Ok(())
}

/// Handle the 'random' command
fn handle_random(store: &SharedStore, count: usize, json: bool) -> Result<()> {
    let movies = services::get_random_movies(count, &store.read());
    if json {
        return print_json(&movies);
    }
    println!("{}", "Random picks:".bold().blue());
    print_summaries(&movies);
    Ok(())
}

/// Handle the 'register' command
fn handle_register(
    store: &SharedStore,
    config: &StoreConfig,
    username: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    let user = {
        let mut repo = store.write();
        services::add_user(username, password, config.password_cost, &mut repo)?;
        services::get_user(username, &repo)?
    };

    if json {
        #[derive(Serialize)]
        struct Registered<'a> {
            username: &'a str,
        }
        return print_json(&Registered {
            username: &user.username,
        });
    }
    println!("{} Registered {}", "✓".green(), user.username.bold());
    Ok(())
}

/// Handle the 'review' command
fn handle_review(
    store: &SharedStore,
    username: &str,
    password: &str,
    movie_id: MovieId,
    text: &str,
    rating: i32,
    json: bool,
) -> Result<()> {
    services::authenticate_user(username, password, &store.read())
        .with_context(|| format!("Could not log in as {}", username))?;

    let review = services::add_review(movie_id, text, username, rating, &mut store.write())?;
    let count = services::get_reviews_for_movie(movie_id, &store.read())?.len();

    if json {
        return print_json(&review);
    }
    println!(
        "{} Review posted for movie {} ({} reviews now)",
        "✓".green(),
        movie_id,
        count
    );
    print_review(&review);
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_movie(movie: &MovieDetail) {
    println!("{}", format!("{} ({})", movie.title, movie.year).bold().blue());
    println!("{}Released: {}", "• ".green(), movie.date);
    println!("{}Director: {}", "• ".green(), movie.director);
    println!("{}Actors: {}", "• ".green(), movie.actors.join(", "));
    println!(
        "{}Genres: {}",
        "• ".green(),
        movie
            .genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("{}Runtime: {} min", "• ".cyan(), movie.runtime);
    println!("{}Rating: {:.1}", "• ".cyan(), movie.rating);
    if !movie.synopsis.is_empty() {
        println!("\n{}\n", movie.synopsis);
    }

    println!("{}", format!("Reviews ({}):", movie.reviews.len()).bold());
    for review in &movie.reviews {
        print_review(review);
    }
}

fn print_review(review: &ReviewView) {
    println!(
        "  {} {} rated {}/10 on {}: {}",
        "•".cyan(),
        review.username.bold(),
        review.rating,
        review.timestamp.format("%Y-%m-%d %H:%M"),
        review.text
    );
}

fn print_summaries(movies: &[MovieSummary]) {
    for movie in movies {
        let id = movie.id.map(|id| id.to_string()).unwrap_or_default();
        println!("  {}. {} ({})", id.green(), movie.title, movie.date);
    }
}

fn print_date_page(page: &DatePage) {
    println!("{}", format!("Released on {}:", page.date).bold().blue());
    if page.movies.is_empty() {
        println!("  (none)");
    }
    print_summaries(&page.movies);

    let previous = page.previous_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    let next = page.next_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    println!("{} {}   {} {}", "previous:".dimmed(), previous, "next:".dimmed(), next);
}

fn print_genre_page(page: &GenrePage) {
    let title = match &page.search {
        Some(search) => format!("{} matching '{}' ({} total):", page.genre, search, page.total),
        None => format!("{} ({} total):", page.genre, page.total),
    };
    println!("{}", title.bold().blue());
    print_summaries(&page.movies);

    let cursors = [
        ("first", page.first_cursor),
        ("previous", page.previous_cursor),
        ("next", page.next_cursor),
        ("last", page.last_cursor),
    ];
    let links: Vec<String> = cursors
        .iter()
        .filter_map(|(label, cursor)| cursor.map(|c| format!("{}: --cursor {}", label, c)))
        .collect();
    if !links.is_empty() {
        println!("{}", links.join("   ").dimmed());
    }
}
