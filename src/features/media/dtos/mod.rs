mod media_dto;

pub use media_dto::{
    normalize_directory, DeleteMediaQuery, DeleteResponseDto, MediaListQuery, MediaListResponseDto,
    UploadMediaDto, UploadResponseDto, MAX_UPLOAD_SIZE,
};
