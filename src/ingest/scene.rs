use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;

use crate::config::{DatabaseConfig, SceneLoading};
use crate::discovery::find_files;
use crate::entities::SRID;
use crate::error::LoadError;
use crate::readers::inspect_raster;

/// Loads rasters with `raster2pgsql`, piping the generated SQL into `psql`.
/// Rows land in the scene table without going through the ORM.
#[derive(Debug, Clone)]
pub struct RasterLoader {
    settings: SceneLoading,
    database: DatabaseConfig,
}

impl RasterLoader {
    pub fn new(settings: SceneLoading, database: DatabaseConfig) -> Self {
        Self { settings, database }
    }

    pub fn raster2pgsql_args(&self, raster: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-s", SRID.to_string().as_str()]
            .into_iter()
            .chain(["-I", "-C", "-x", "-e", "-M"])
            .chain(["-t", self.settings.tile_size.as_str()])
            .chain(["-a", "-l", self.settings.overview_factor.to_string().as_str()])
            .chain(["-F"])
            .map(OsString::from)
            .collect();

        args.push(raster.as_os_str().to_os_string());
        args.push(OsString::from(&self.settings.table));
        args
    }

    /// Client flags: stop at the first failing statement so a rejected
    /// insert surfaces as a non-zero exit.
    pub fn psql_args(&self) -> [&'static str; 3] {
        ["-v", "ON_ERROR_STOP=1", "-q"]
    }

    pub async fn load(&self, raster: &Path) -> Result<(), LoadError> {
        let mut producer = Command::new(&self.settings.raster2pgsql)
            .args(self.raster2pgsql_args(raster))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LoadError::Spawn {
                program: self.settings.raster2pgsql.clone(),
                source,
            })?;

        let sql: Stdio = producer
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("raster2pgsql stdout was not captured"))?
            .try_into()?;

        let consumer = Command::new(&self.settings.psql)
            .args(self.psql_args())
            .envs(self.database.libpq_env())
            .stdin(sql)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LoadError::Spawn {
                program: self.settings.psql.clone(),
                source,
            })?;

        // Both sides are drained together so neither blocks on a full pipe.
        let (produced, consumed) =
            tokio::try_join!(producer.wait_with_output(), consumer.wait_with_output())?;

        check_exit(&self.settings.raster2pgsql, produced)?;
        check_exit(&self.settings.psql, consumed)?;

        Ok(())
    }
}

fn check_exit(program: &str, output: Output) -> Result<(), LoadError> {
    if output.status.success() {
        return Ok(());
    }

    Err(LoadError::Process {
        program: program.to_string(),
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Loads every scene raster in `dir` and returns their file names, which is
/// what `raster2pgsql -F` stores in the `filename` column.
pub async fn ingest_scenes(
    loader: &RasterLoader,
    dir: &Path,
    pattern: &str,
) -> Result<Vec<String>, LoadError> {
    let rasters = find_files(dir, pattern)?;
    if rasters.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!("Insert scene...");
    let mut filenames = Vec::with_capacity(rasters.len());

    for (i, raster) in rasters.iter().enumerate() {
        let raster = std::path::absolute(raster)?;
        let filename = raster
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let info = inspect_raster(&raster)?;
        tracing::info!(
            "{}/{}: {} ({}x{}, {} bands)",
            i + 1,
            rasters.len(),
            filename,
            info.width,
            info.height,
            info.bands
        );

        loader.load(&raster).await?;
        filenames.push(filename);
    }

    Ok(filenames)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use gdal::DriverManager;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    pub fn database() -> DatabaseConfig {
        DatabaseConfig {
            user: "postgres".to_string(),
            password: "secret".to_string(),
            dbname: "barata".to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }

    pub fn loader(raster2pgsql: &str, psql: &str) -> RasterLoader {
        let settings = SceneLoading {
            raster2pgsql: raster2pgsql.to_string(),
            psql: psql.to_string(),
            ..SceneLoading::default()
        };
        RasterLoader::new(settings, database())
    }

    pub fn write_raster(path: &Path) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let dataset = driver.create(path, 8, 8, 1).unwrap();
        drop(dataset);
    }

    /// Stand-in for `psql`: records its arguments next to itself, drains
    /// stdin and exits with `status`.
    pub fn client(dir: &Path, status: i32) -> String {
        let path = dir.join(format!("client_{}.sh", status));
        let args = dir.join("client_args.txt");
        fs::write(
            &path,
            format!(
                "#!/bin/sh\necho \"$@\" > '{}'\ncat > /dev/null\n[ {} -eq 0 ] || echo 'ERROR: rejected' >&2\nexit {}\n",
                args.display(),
                status,
                status
            ),
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }
}
