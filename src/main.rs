use colored::Colorize;

fn main() {
    if let Err(error) = svncmd::run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
