use std::io::Write;
use log::error;
use crate::config::Config;
use crate::error::Error;
use crate::explorer::ExplorerClient;

mod config;
mod error;
mod explorer;
mod report;
mod transaction;

fn read_address() -> Result<String, Error> {
    print!("Entrez une adresse Bitcoin : ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn run(config: &Config) -> Result<(), Error> {
    let address = read_address()?;

    let client = ExplorerClient::new(&config.api_base_url)?;
    let transactions = explorer::fetch_address_transactions(&client, &address);
    if transactions.is_empty() {
        println!("Aucune transaction trouvée ou une erreur s'est produite");
        return Ok(());
    }

    println!("{} transactions récupérées pour l'adresse {}", transactions.len(), address);

    let rows = report::flatten(&transactions);
    println!("\nTransactions associées à l'adresse Bitcoin :");
    report::print_report(&rows, &mut std::io::stdout().lock())?;

    report::write_report_csv(&config.output_path, &rows)?;
    println!("Les résultats ont été sauvegardés dans '{}'", config.output_path);
    Ok(())
}

fn main() {
    env_logger::init();
    println!("Début de l'exécution du programme");

    let config = Config::from_env();
    if let Err(e) = run(&config) {
        error!("{}", e);
        std::process::exit(1);
    }
}
