//! 投資家向けプリセット（固定コンテンツ）
//!
//! デッキの文面と画像の取得元URL。日付だけは呼び出し側が渡す。

use crate::assets::{PortfolioKey, PortfolioSources};
use crate::document::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn office_info() -> OfficeInfo {
    OfficeInfo {
        address: "Gedung Tempo Scan Lt.32, Jl. H. R. Rasuna Said, Kuningan Timur, Setiabudi, Jakarta Selatan 12950".into(),
        phone: "+62 821-4898-8520".into(),
        email: "corporate@ksim.co.id".into(),
        website: "www.ksimholding.co.id".into(),
        logo_url: "https://drive.google.com/uc?export=view&id=1X5Vu5s9o4wu0oIsxM3GVLY-OzyI-tz7i".into(),
        management_team: vec![
            ManagementTeamMember {
                name: "Nunung Suhudiah, S.E.".into(),
                title: "Ketua Umum Koperasi Syarikat Islam Mandiri".into(),
                photo_url: "https://drive.google.com/uc?export=view&id=1bdgKzkInNbZXE6YRF_aNpZo2FpscPcLj".into(),
            },
            ManagementTeamMember {
                name: "Dr. Hamdan Zoelva, S.H., M.H.".into(),
                title: "Ketua Dewan Pengawas Koperasi Syarikat Islam Mandiri".into(),
                photo_url: "https://drive.google.com/uc?export=view&id=1bdgKzkInNbZXE6YRF_aNpZo2FpscPcLj".into(),
            },
        ],
    }
}

fn sectors() -> Sectors {
    Sectors {
        sawit: Sector {
            name: "Ekosistem Sawit Terpadu".into(),
            value_chain: "Pembibitan → Budidaya → Panen → Pengangkutan → Mini Plant CPO → Penjualan".into(),
            operations: strings(&[
                "Kemitraan dengan kelompok tani sawit swadaya di Riau dan Kalimantan",
                "Penyediaan bibit unggul dan pupuk",
                "Pengangkutan TBS menggunakan armada sendiri",
                "Mini plant CPO statis (5 ton/jam) dan mobile",
            ]),
            partners: strings(&["GAPKI", "Pabrik refinery nasional", "10.000 KK Petani Plasma"]),
            capacity: "20 unit mini plant (5 ton/jam per unit)".into(),
            locations: strings(&["Riau", "Kalimantan Barat", "Kalimantan Tengah"]),
            photos: vec![PortfolioKey::SawitPlantation, PortfolioKey::SawitMill],
        },
        perikanan: Sector {
            name: "Model Offtaker Perikanan".into(),
            value_chain: "Penangkapan → Pengumpulan → Cold Storage → Pengolahan → Distribusi".into(),
            operations: strings(&[
                "Kemitraan dengan 2.000 nelayan tradisional di Maluku",
                "Kapal pengumpul membeli langsung di laut (eliminasi tengkulak)",
                "Cold storage blast freezing (-40°C)",
                "Pengolahan & Ekspor tuna grade A ke Jepang",
            ]),
            partners: strings(&["Kementerian Kelautan", "Asosiasi Nelayan", "Trading house Jepang"]),
            capacity: "Cold storage 500 ton, 5 kapal pengumpul".into(),
            locations: strings(&["Ambon", "Seram", "Buru"]),
            photos: vec![PortfolioKey::FisheryOcean, PortfolioKey::FisheryColdStorage],
        },
        pertanian: Sector {
            name: "Supply Chain Pertanian".into(),
            value_chain: "Budidaya → Panen → Sortasi → Packing → Distribusi".into(),
            operations: strings(&[
                "Kemitraan dengan 5.000 petani di Cianjur & Karawang",
                "Jadwal tanam terkoordinasi",
                "Pusat sortasi dengan AI grading",
                "Pengepakan ritel & Distribusi armada berpendingin",
            ]),
            partners: strings(&["Kementan", "Asosiasi Petani", "Ritel modern nasional"]),
            capacity: "Sortasi 50 ton/hari, cold storage 300 ton".into(),
            locations: strings(&["Cianjur", "Karawang", "Bandung"]),
            photos: vec![PortfolioKey::FarmVegetables, PortfolioKey::FarmDistribution],
        },
    }
}

/// 投資家向けデッキの文書を構築
///
/// # Arguments
/// * `date` - 表紙に表示する年月（例: "Oktober 2026"）
pub fn investor_preset(date: &str) -> PresentationDocument {
    PresentationDocument {
        meta: MetaData {
            title: "KOPERASI SYARIKAT ISLAM MANDIRI".into(),
            subtitle: "Holding Ekonomi Umat Nasional".into(),
            date: date.to_string(),
            office: office_info(),
        },
        executive_summary: strings(&[
            "Holding koperasi modern yang mengintegrasikan tiga sektor strategis nasional: kelapa sawit, perikanan, dan pertanian hortikultura",
            "Model offtaker eksklusif yang menjamin harga layak dan pasar pasti bagi 15.000+ petani dan nelayan binaan",
            "Infrastruktur pasca panen terintegrasi: mini plant CPO, cold storage, dan pusat sortasi berbasis teknologi",
            "Platform digital untuk transparansi rantai pasok dan akses pasar langsung ke ritel modern & ekspor",
            "Dikelola oleh tim manajemen profesional dengan pengawasan Dewan Pakar terkemuka",
        ]),
        problem_statement: ProblemStatement {
            title: "Tantangan Struktural Agromaritim".into(),
            points: strings(&[
                "Petani sawit swadaya hanya menikmati 30-40% dari harga jual CPO akibat dominasi tengkulak",
                "Nelayan tradisional di Maluku menjual ikan 50% lebih rendah dari harga pasar karena ketiadaan cold storage",
                "Susut pasca panen sayuran mencapai 25% akibat tidak ada fasilitas sortasi dan grading",
                "Fragmentasi lahan (<2 hektar) dan operasi individual tanpa skala ekonomi",
                "Akses terbatas ke pembiayaan dan pasar modern",
            ]),
            opportunity: "Dengan struktur yang tepat, potensi ekonomi umat di tiga sektor ini dapat meningkatkan kontribusi PDB nasional secara signifikan".into(),
        },
        solution: Solution {
            title: "Solusi KSIM: Ekosistem Terintegrasi".into(),
            pillars: vec![
                Pillar { name: "Model Offtaker".into(), description: "Menjadi pembeli tunggal yang menjamin harga layak dan pasar pasti".into() },
                Pillar { name: "Infrastruktur Pasca Panen".into(), description: "Mini plant, cold storage, pusat sortasi di sentra produksi".into() },
                Pillar { name: "Teknologi Digital".into(), description: "Platform prediksi panen, marketplace, dan traceability".into() },
                Pillar { name: "Pendampingan Petani".into(), description: "Pelatihan teknis, sertifikasi, dan akses input produksi berkualitas".into() },
            ],
            differentiators: strings(&[
                "Menggabungkan kekuatan kolektivitas koperasi dengan profesionalisme korporasi",
                "Fokus pada infrastruktur fisik sebagai fondasi ekosistem",
                "Pendekatan berbasis kemitraan setara, bukan eksploitasi",
                "Diawasi oleh Dewan Pengawas dengan rekam jejak nasional",
            ]),
        },
        market_overview: MarketOverview {
            title: "Lanskap Pasar & Tren Industri".into(),
            sawit: "Permintaan global CPO tumbuh 4-5% per tahun. Kebijakan B35 menciptakan pasar domestik stabil.".into(),
            perikanan: "Konsumsi ikan per kapita Indonesia mencapai 62 kg/tahun. Ekspor tuna dan cakalang tumbuh pesat.".into(),
            pertanian: "Urbanisasi meningkatkan permintaan sayuran berkualitas untuk ritel modern.".into(),
            tam: "Nilai ekonomi ketiga sektor mencapai triliunan rupiah dengan jutaan petani/nelayan di 34 provinsi".into(),
            sam: "Fokus sentra produksi utama: Sumatra/Kalimantan, Maluku, Jawa Barat - 40% potensi nasional".into(),
            som: "Target 5% pangsa pasar di setiap sektor dalam 3 tahun melalui kemitraan eksklusif".into(),
        },
        business_model: BusinessModel {
            title: "Model Bisnis & Pendapatan".into(),
            revenue_streams: strings(&[
                "Margin trading komoditas - pembelian dari petani, penjualan ke industri/eksportir",
                "Fee-based income - storage fee, logistics, quality certification",
                "Bagi hasil pembiayaan - pendampingan modal kerja petani",
            ]),
            cost_structure: strings(&[
                "Investasi infrastruktur pasca panen (depresiasi 10-15 tahun)",
                "Biaya operasional: tenaga kerja, energi, transportasi",
                "Teknologi: pengembangan platform digital",
                "Pendampingan petani: pelatihan, sertifikasi",
            ]),
            scalability: "Model mobile dan modular - mini plant bisa dipindah, platform multi-tenant, skema kemitraan standar".into(),
        },
        sectors: sectors(),
        competitive_advantages: strings(&[
            "Model hybrid: kekuatan koperasi + profesionalisme korporasi",
            "Infrastruktur fisik sebagai entry barrier",
            "Jejaring historis yang mengakar",
            "Fokus nilai tambah di hilir",
            "Transparansi rantai pasok digital",
            "Dewan Pengawas kredibel",
        ]),
        swot: Swot {
            strengths: "Model hybrid, infrastruktur fisik, jejaring umat, fokus hilirisasi".into(),
            weaknesses: "Modal awal besar, pengembangan SDM daerah".into(),
            opportunities: "Tren ESG, program ketahanan pangan, digitalisasi".into(),
            threats: "Fluktuasi harga, perubahan iklim, kompetitor".into(),
        },
        traction: Traction {
            partnerships: strings(&[
                "MOU Gapoktan Sawit Riau (5.000 petani, 12.000 ha)",
                "Kerjasama DKP Maluku untuk cold storage",
                "LOI Hypermart untuk sayuran 50 ton/bulan",
            ]),
            infrastructure: strings(&[
                "Mini plant CPO Kampar - tahap konstruksi",
                "Cold storage Ambon - izin selesai",
                "Pusat sortasi Cianjur - akuisisi lahan",
            ]),
            technology: strings(&["Super app koperasi (500 petani tester)", "Sistem SCM berbasis IoT"]),
            impact: Impact {
                farmers: "15.000+".into(),
                employment: "8.000".into(),
                income: "30-40%".into(),
            },
        },
        roadmap: Roadmap {
            phase1: RoadmapPhase {
                title: "Foundation (Bulan 1-12)".into(),
                milestones: strings(&["Mini plant CPO Riau", "Cold storage Ambon", "Pusat sortasi Cianjur", "Peluncuran super app"]),
            },
            phase2: RoadmapPhase {
                title: "Scaling (Bulan 13-24)".into(),
                milestones: strings(&["3 unit mini plant Kalimantan", "Cold storage Buru", "Pusat sortasi Karawang", "Ekspor tuna & CPO"]),
            },
            phase3: RoadmapPhase {
                title: "Expansion (Bulan 25-36)".into(),
                milestones: strings(&["10 unit mini plant", "Cold storage Papua Barat", "Pusat sortasi 3 provinsi Jawa", "Persiapan IPO Koperasi"]),
            },
        },
        risks: vec![
            Risk { risk: "Fluktuasi harga".into(), mitigation: "Diversifikasi 3 sektor, kontrak jangka panjang".into() },
            Risk { risk: "Gagal panen".into(), mitigation: "Pendampingan teknis, asuransi, varietas unggul".into() },
            Risk { risk: "Infrastruktur".into(), mitigation: "Pemeliharaan rutin, teknisi lokal".into() },
            Risk { risk: "Regulasi".into(), mitigation: "Kepatuhan penuh, kerjasama asosiasi".into() },
        ],
        investment_ask: InvestmentAsk {
            title: "Kemitraan Strategis".into(),
            use_of_funds: strings(&[
                "Pembangunan infrastruktur fisik",
                "Pengembangan teknologi digital",
                "Modal kerja pembelian panen",
                "Ekspansi sentra produksi baru",
            ]),
            rationale: strings(&[
                "Investasi pada aset nyata",
                "Arus kas berulang margin terprediksi",
                "Diversifikasi mengurangi risiko",
                "Dukungan pemerintah",
            ]),
            investor_return: strings(&[
                "Bagi hasil kompetitif",
                "Dampak sosial terukur",
                "Insentif pajak",
                "Potensi exit IPO",
            ]),
        },
        closing: "Koperasi Syarikat Islam Mandiri: Menjembatani potensi umat dengan pasar global melalui ekosistem yang adil, transparan, dan berkelanjutan. Bersama membangun peradaban ekonomi umat.".into(),
    }
}

/// ポートフォリオ画像の取得元
pub fn portfolio_sources() -> PortfolioSources {
    PortfolioSources {
        entries: vec![
            (PortfolioKey::SawitPlantation, "https://images.unsplash.com/photo-1590283603385-17ffb3a7f29f?auto=format&fit=crop&w=1200&q=80".into()),
            (PortfolioKey::SawitMill, "https://images.unsplash.com/photo-1516937941344-00b4e0337589?auto=format&fit=crop&w=1200&q=80".into()),
            (PortfolioKey::FisheryOcean, "https://images.unsplash.com/photo-1534951009808-dfd00613984d?auto=format&fit=crop&w=1200&q=80".into()),
            (PortfolioKey::FisheryColdStorage, "https://images.unsplash.com/photo-1586528116311-ad8dd3c8310d?auto=format&fit=crop&w=1200&q=80".into()),
            (PortfolioKey::FarmVegetables, "https://images.unsplash.com/photo-1523348837708-15d4a09cfac2?auto=format&fit=crop&w=1200&q=80".into()),
            (PortfolioKey::FarmDistribution, "https://images.unsplash.com/photo-1566576721346-d4a3b4eaad5b?auto=format&fit=crop&w=1200&q=80".into()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_shape() {
        let doc = investor_preset("Oktober 2026");
        assert_eq!(doc.meta.date, "Oktober 2026");
        assert_eq!(doc.meta.office.management_team.len(), 2);
        assert_eq!(doc.competitive_advantages.len(), 6);
        assert!(doc.closing.starts_with("Koperasi Syarikat Islam Mandiri"));
    }

    #[test]
    fn test_every_portfolio_key_has_source_and_owner() {
        let doc = investor_preset("Oktober 2026");
        let sources = portfolio_sources();
        for key in PortfolioKey::ALL {
            assert!(sources.url(key).is_some(), "URLなし: {}", key);
            let owners = doc.sectors.iter().filter(|(_, s)| s.photos.contains(&key)).count();
            assert_eq!(owners, 1, "{} を持つセクターが1つではない", key);
        }
    }
}
