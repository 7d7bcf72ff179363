use super::{to_body, AyonClient, Target};
use crate::error::{ClientError, ClientResult};
use crate::models::folder::{SEQUENCE, SHOT};
use crate::models::{is_root_parent, Folder, FolderFilter, FolderPatch, Mutation, StatusResponse};
use crate::types::{EntityKind, HttpMethod, Operation};

const KIND: EntityKind = EntityKind::Folder;

fn folders_endpoint(project_name: &str) -> String {
    format!("projects/{}/folders", project_name)
}

fn folder_endpoint(project_name: &str, folder_id: &str) -> String {
    format!("projects/{}/folders/{}", project_name, folder_id)
}

impl AyonClient {
    /// List folders, filtered server-side by type and/or parent
    pub async fn get_folders(&self, project_name: &str, filter: &FolderFilter) -> ClientResult<Vec<Folder>> {
        self.call(
            Target::new(KIND, Operation::List),
            HttpMethod::Get,
            &folders_endpoint(project_name),
            &filter.to_query(),
            None,
        )
        .await?
        .list(KIND)
    }

    pub async fn get_folder(&self, project_name: &str, folder_id: &str) -> ClientResult<Folder> {
        self.call(
            Target::new(KIND, Operation::Get).id(folder_id),
            HttpMethod::Get,
            &folder_endpoint(project_name, folder_id),
            &[],
            None,
        )
        .await?
        .entity(KIND)
    }

    pub async fn create_folder(
        &self,
        project_name: &str,
        folder: &Folder,
    ) -> ClientResult<Mutation<Folder>> {
        let body = to_body(folder, KIND)?;
        self.call(
            Target::new(KIND, Operation::Create),
            HttpMethod::Post,
            &folders_endpoint(project_name),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    /// Replace a folder with PUT
    pub async fn update_folder(
        &self,
        project_name: &str,
        folder_id: &str,
        folder: &Folder,
    ) -> ClientResult<Mutation<Folder>> {
        let body = to_body(folder, KIND)?;
        self.call(
            Target::new(KIND, Operation::Update).id(folder_id),
            HttpMethod::Put,
            &folder_endpoint(project_name, folder_id),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    /// Change only the fields set in `patch`
    pub async fn patch_folder(
        &self,
        project_name: &str,
        folder_id: &str,
        patch: &FolderPatch,
    ) -> ClientResult<Mutation<Folder>> {
        let body = to_body(patch, KIND)?;
        self.call(
            Target::new(KIND, Operation::Update).id(folder_id),
            HttpMethod::Patch,
            &folder_endpoint(project_name, folder_id),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    /// Delete a folder; `force` also removes its children on the server
    pub async fn delete_folder(
        &self,
        project_name: &str,
        folder_id: &str,
        force: bool,
    ) -> ClientResult<StatusResponse> {
        let params = if force {
            vec![("force".to_string(), "true".to_string())]
        } else {
            Vec::new()
        };
        self.call(
            Target::new(KIND, Operation::Delete).id(folder_id),
            HttpMethod::Delete,
            &folder_endpoint(project_name, folder_id),
            &params,
            None,
        )
        .await?;
        Ok(StatusResponse::success())
    }

    pub async fn get_sequences(&self, project_name: &str) -> ClientResult<Vec<Folder>> {
        self.get_folders(project_name, &FolderFilter::of_type(SEQUENCE))
            .await
    }

    /// First folder named `name`, optionally restricted to a folder type
    pub async fn get_folder_by_name(
        &self,
        project_name: &str,
        name: &str,
        folder_type: Option<&str>,
    ) -> ClientResult<Option<Folder>> {
        let filter = FolderFilter {
            folder_type: folder_type.map(str::to_string),
            parent_id: None,
        };
        let folders = self.get_folders(project_name, &filter).await?;
        Ok(folders
            .into_iter()
            .find(|f| f.name.as_deref() == Some(name)))
    }

    /// Shot folders under the sequence named `sequence_name`
    pub async fn get_shots(&self, project_name: &str, sequence_name: &str) -> ClientResult<Vec<Folder>> {
        let sequence = self
            .get_folder_by_name(project_name, sequence_name, Some(SEQUENCE))
            .await?
            .ok_or_else(|| ClientError::not_found(KIND, sequence_name))?;
        let sequence_id = sequence
            .id
            .ok_or_else(|| ClientError::not_found(KIND, sequence_name))?;

        self.get_folders(project_name, &FolderFilter::of_type(SHOT).with_parent(sequence_id))
            .await
    }

    /// The shot named `shot_name` inside a sequence, `None` when the sequence lacks it
    pub async fn get_shot(
        &self,
        project_name: &str,
        sequence_name: &str,
        shot_name: &str,
    ) -> ClientResult<Option<Folder>> {
        let shots = self.get_shots(project_name, sequence_name).await?;
        Ok(shots
            .into_iter()
            .find(|f| f.name.as_deref() == Some(shot_name)))
    }

    /// Resolve a slash-separated path of folder names, e.g. `"sq010/sh010"`,
    /// starting from the top of the project.
    ///
    /// Empty segments are ignored. Returns `None` as soon as a segment has no match.
    pub async fn get_folder_by_path(
        &self,
        project_name: &str,
        path: &str,
    ) -> ClientResult<Option<Folder>> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let Some(first) = segments.next() else {
            return Ok(None);
        };

        let top = self
            .get_folders(project_name, &FolderFilter::default())
            .await?
            .into_iter()
            .find(|f| {
                f.name.as_deref() == Some(first)
                    && is_root_parent(f.parent_id.as_deref(), project_name)
            });
        let Some(mut current) = top else {
            return Ok(None);
        };

        for segment in segments {
            let Some(parent_id) = current.id.clone() else {
                return Ok(None);
            };
            let child = self
                .get_folders(project_name, &FolderFilter::default().with_parent(parent_id))
                .await?
                .into_iter()
                .find(|f| f.name.as_deref() == Some(segment));
            match child {
                Some(folder) => current = folder,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}
