use crate::core::config::Config;
use crate::core::download::{download_to, LineProgress, NoProgress, ProgressReporter};
use crate::core::extract::{DownloadBoxExtractor, LinkExtractor};
use crate::core::fetch::{read_document, Fetcher, HttpFetcher, REQUEST_TIMEOUT};
use crate::core::install::{CommandInstaller, Installer};
use crate::core::version::{self, available_version, CommandVersionProbe, VersionProbe};
use crate::error::Result;
use crate::utils::fs;
use crate::utils::prompt::{LinePrompt, Prompt};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The installed toolchain already matches the listed release.
    AlreadyCurrent { version: String },
    /// An archive was already on disk and the user chose to keep it.
    Declined,
    Installed { version: Option<String> },
}

/// The download-and-install pipeline: fetch listing, extract link, compare
/// versions, download, install, clean up. Every step runs in order and the
/// first error ends the run.
pub struct Updater<'a> {
    config: &'a Config,
    fetcher: &'a dyn Fetcher,
    extractor: &'a dyn LinkExtractor,
    probe: &'a dyn VersionProbe,
    installer: &'a dyn Installer,
}

impl<'a> Updater<'a> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a dyn Fetcher,
        extractor: &'a dyn LinkExtractor,
        probe: &'a dyn VersionProbe,
        installer: &'a dyn Installer,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            probe,
            installer,
        }
    }

    /// Fetches the listing page and returns the platform archive URL.
    pub fn resolve_download_url(&self) -> Result<Url> {
        let page = &self.config.download_page;
        let body = self.fetcher.get(page, Some(REQUEST_TIMEOUT))?;
        let html = read_document(page, body)?;
        self.extractor.extract(&html, page)
    }

    pub fn run(
        &self,
        prompt: &mut dyn Prompt,
        progress: &mut dyn ProgressReporter,
    ) -> Result<UpdateOutcome> {
        println!("Get download URL");
        let url = self.resolve_download_url()?;
        log::info!("download URL: {url}");

        let version = available_version(&url);
        if self.config.check_version {
            let installed = self.probe.installed_version()?;
            println!("Installed version: {installed}");
            println!("Current version: {}", version.as_deref().unwrap_or_default());

            if let Some(available) = version.as_ref().filter(|v| **v == installed) {
                println!("The current version is installed");
                return Ok(UpdateOutcome::AlreadyCurrent {
                    version: available.clone(),
                });
            }
        }

        let archive = &self.config.archive_path;
        if archive.exists()
            && !self.config.assume_yes
            && !prompt.confirm("File exists. Replace it?", true)?
        {
            println!("Keeping existing {}", archive.display());
            return Ok(UpdateOutcome::Declined);
        }

        println!("Download file: {url}");
        let mut body = self.fetcher.get(&url, None)?;
        let bytes = download_to(&mut body, archive, progress)?;
        drop(body);
        log::info!("downloaded {bytes} bytes to {}", archive.display());

        let root = &self.config.install_root;
        println!("Install to {}", root.display());
        self.installer.install(root, archive)?;

        println!("Remove temp files");
        fs::remove_file(archive)?;

        println!("Update complete");
        Ok(UpdateOutcome::Installed { version })
    }
}

/// Runs the pipeline with the network, terminal and subprocess
/// implementations.
pub fn update_toolchain(config: &Config) -> Result<UpdateOutcome> {
    let fetcher = HttpFetcher::new()?;
    let extractor = DownloadBoxExtractor::new(&config.selector_class, &config.platform);
    let probe = CommandVersionProbe::for_config(config);
    let installer = CommandInstaller::new(config.elevate.clone());

    let mut prompt = LinePrompt::stdio();
    let mut progress: Box<dyn ProgressReporter> = if config.show_progress {
        Box::new(LineProgress::stdout())
    } else {
        Box::new(NoProgress)
    };

    let outcome = Updater::new(config, &fetcher, &extractor, &probe, &installer)
        .run(&mut prompt, progress.as_mut())?;

    if matches!(outcome, UpdateOutcome::Installed { .. }) {
        report_installed(config);
    }

    Ok(outcome)
}

/// Prints `go version` of the freshly installed toolchain.
pub fn report_installed(config: &Config) {
    match version::run_version(&config.go_binary()) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => log::warn!("could not query installed version: {e}"),
    }
}
