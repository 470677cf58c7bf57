//! The static catalog of downloadable GGUF model files.

use medassist_shared::ArtifactDescriptor;

/// Models known to the fetcher, in listing order.
pub static CATALOG: &[ArtifactDescriptor] = &[
    ArtifactDescriptor {
        id: "phi-2-q4",
        name: "Phi-2 Q4_K_M (Recommended)",
        url: "https://huggingface.co/microsoft/phi-2-gguf/resolve/main/phi-2.Q4_K_M.gguf",
        size: "1.7GB",
        description: "Microsoft Phi-2 2.7B model, 4-bit quantized for efficiency",
        ram_requirement: "1-2GB",
        recommended: true,
    },
    ArtifactDescriptor {
        id: "phi-2-q2",
        name: "Phi-2 Q2_K (Ultra Low-Spec)",
        url: "https://huggingface.co/microsoft/phi-2-gguf/resolve/main/phi-2.Q2_K.gguf",
        size: "1.1GB",
        description: "Microsoft Phi-2 2.7B model, 2-bit quantized for very low-spec devices",
        ram_requirement: "512MB-1GB",
        recommended: false,
    },
    ArtifactDescriptor {
        id: "qwen2-1.5b-q4",
        name: "Qwen2-1.5B Q4_K_M",
        url: "https://huggingface.co/Qwen/Qwen2-1.5B-Instruct-GGUF/resolve/main/qwen2-1_5b-instruct-q4_k_m.gguf",
        size: "1.0GB",
        description: "Qwen2 1.5B model, good balance of size and performance",
        ram_requirement: "1GB",
        recommended: true,
    },
    ArtifactDescriptor {
        id: "tinyllama-q4",
        name: "TinyLlama Q4_K_M (Smallest)",
        url: "https://huggingface.co/TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF/resolve/main/tinyllama-1.1b-chat-v1.0.Q4_K_M.gguf",
        size: "700MB",
        description: "TinyLlama 1.1B model, smallest option for very limited devices",
        ram_requirement: "512MB",
        recommended: false,
    },
];

/// Look up a catalog entry by id.
pub fn find<'a>(catalog: &'a [ArtifactDescriptor], id: &str) -> Option<&'a ArtifactDescriptor> {
    catalog.iter().find(|a| a.id == id)
}

/// Look up the catalog entry whose derived file name is `file_name`.
pub fn find_by_file_name<'a>(
    catalog: &'a [ArtifactDescriptor],
    file_name: &str,
) -> Option<&'a ArtifactDescriptor> {
    catalog.iter().find(|a| a.local_name() == file_name)
}
