pub mod api;

pub use api::{ApiErrorDetail, PERSONALIZE_PATH, RESULT_FILENAME, UPLOAD_FIELD};

use crate::usecases::common::UseCaseMetadata;

pub struct PersonalizePhoto;

impl UseCaseMetadata for PersonalizePhoto {
    fn usecase_index() -> &'static str {
        "u101"
    }

    fn usecase_name() -> &'static str {
        "personalize_photo"
    }

    fn display_name() -> &'static str {
        "Illustration Personalizer"
    }

    fn description() -> &'static str {
        "Personalize illustrations with your photos"
    }
}
